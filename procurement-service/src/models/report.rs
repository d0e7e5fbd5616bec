//! Accounts-payable summary report shapes.

use crate::models::money::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use uuid::Uuid;

/// Monetary columns shared by vendor rows and the totals row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApAmounts {
    pub po_amount: Decimal,
    pub change_order_amount: Decimal,
    pub total_invoice_value: Decimal,
    pub paid_to_date: Decimal,
    pub holdback: Decimal,
    pub tax: Decimal,
    // Planned columns with no agreed formula yet; always zero until one is
    // specified.
    pub billed_by_vendor: Decimal,
    pub balance: Decimal,
    pub ap_balance: Decimal,
}

impl ApAmounts {
    /// True when the vendor had no PO, CO, invoice, tax or holdback activity.
    pub fn is_inactive(&self) -> bool {
        self.po_amount.is_zero()
            && self.change_order_amount.is_zero()
            && self.total_invoice_value.is_zero()
            && self.tax.is_zero()
            && self.holdback.is_zero()
    }

    pub fn rounded(&self) -> Self {
        Self {
            po_amount: round_money(self.po_amount),
            change_order_amount: round_money(self.change_order_amount),
            total_invoice_value: round_money(self.total_invoice_value),
            paid_to_date: round_money(self.paid_to_date),
            holdback: round_money(self.holdback),
            tax: round_money(self.tax),
            billed_by_vendor: Decimal::ZERO,
            balance: Decimal::ZERO,
            ap_balance: Decimal::ZERO,
        }
    }

    /// Column-wise sum, or `None` when any column leaves the `Decimal` range.
    pub fn checked_add(&self, rhs: &ApAmounts) -> Option<ApAmounts> {
        Some(Self {
            po_amount: self.po_amount.checked_add(rhs.po_amount)?,
            change_order_amount: self.change_order_amount.checked_add(rhs.change_order_amount)?,
            total_invoice_value: self.total_invoice_value.checked_add(rhs.total_invoice_value)?,
            paid_to_date: self.paid_to_date.checked_add(rhs.paid_to_date)?,
            holdback: self.holdback.checked_add(rhs.holdback)?,
            tax: self.tax.checked_add(rhs.tax)?,
            billed_by_vendor: self.billed_by_vendor.checked_add(rhs.billed_by_vendor)?,
            balance: self.balance.checked_add(rhs.balance)?,
            ap_balance: self.ap_balance.checked_add(rhs.ap_balance)?,
        })
    }
}

/// Column-wise sum that clamps at the `Decimal` range.
impl AddAssign<&ApAmounts> for ApAmounts {
    fn add_assign(&mut self, rhs: &ApAmounts) {
        self.po_amount = self.po_amount.saturating_add(rhs.po_amount);
        self.change_order_amount = self.change_order_amount.saturating_add(rhs.change_order_amount);
        self.total_invoice_value = self.total_invoice_value.saturating_add(rhs.total_invoice_value);
        self.paid_to_date = self.paid_to_date.saturating_add(rhs.paid_to_date);
        self.holdback = self.holdback.saturating_add(rhs.holdback);
        self.tax = self.tax.saturating_add(rhs.tax);
        self.billed_by_vendor = self.billed_by_vendor.saturating_add(rhs.billed_by_vendor);
        self.balance = self.balance.saturating_add(rhs.balance);
        self.ap_balance = self.ap_balance.saturating_add(rhs.ap_balance);
    }
}

/// One vendor's line in the AP summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorApSummaryRow {
    pub vendor_uuid: Uuid,
    pub vendor_name: String,
    #[serde(flatten)]
    pub amounts: ApAmounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_name: String,
    pub project_id: String,
}

/// Response body of the AP summary endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApSummaryReport {
    pub project: ProjectSummary,
    pub vendors: Vec<VendorApSummaryRow>,
    pub totals: ApAmounts,
}
