//! Store-side views of projects, vendors and procurement documents.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Project lookup result.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub uuid: Uuid,
    pub corporation_uuid: Uuid,
    pub project_name: String,
    /// Human-facing project number, e.g. `PRJ-0042`.
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vendor {
    pub uuid: Uuid,
    pub corporation_uuid: Uuid,
    pub vendor_name: String,
}

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Approved,
    Paid,
    Void,
    Other,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Approved => "Approved",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Void => "Void",
            InvoiceStatus::Other => "Other",
        }
    }

    /// Statuses are stored exactly as the workflow writes them; any other
    /// spelling (`"PAID"`, `"paid "`) is [`InvoiceStatus::Other`].
    pub fn from_string(s: &str) -> Self {
        match s {
            "Draft" => InvoiceStatus::Draft,
            "Pending" => InvoiceStatus::Pending,
            "Approved" => InvoiceStatus::Approved,
            "Paid" => InvoiceStatus::Paid,
            "Void" => InvoiceStatus::Void,
            _ => InvoiceStatus::Other,
        }
    }
}

/// How an invoice was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    AgainstPo,
    AgainstCo,
    DirectInvoice,
    AdvancePayment,
    HoldbackRelease,
}

impl InvoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceType::AgainstPo => "against_po",
            InvoiceType::AgainstCo => "against_co",
            InvoiceType::DirectInvoice => "direct_invoice",
            InvoiceType::AdvancePayment => "advance_payment",
            InvoiceType::HoldbackRelease => "holdback_release",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "against_po" => InvoiceType::AgainstPo,
            "against_co" => InvoiceType::AgainstCo,
            "advance_payment" | "against_advance_payment" => InvoiceType::AdvancePayment,
            "holdback_release" | "against_holdback_amount" => InvoiceType::HoldbackRelease,
            _ => InvoiceType::DirectInvoice,
        }
    }
}

/// A purchase order, change order or vendor invoice as read from the store.
///
/// Only the fields the AP summary needs are carried. `amount` and `holdback`
/// are set for invoices only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRecord {
    pub uuid: Uuid,
    pub corporation_uuid: Uuid,
    pub project_uuid: Uuid,
    pub vendor_uuid: Option<Uuid>,
    pub status: String,
    /// `bill_date` for invoices, the order date for POs and COs.
    pub document_date: Option<NaiveDate>,
    pub invoice_type: Option<String>,
    pub amount: Option<Decimal>,
    /// Percentage of `amount` withheld.
    pub holdback: Option<Decimal>,
    pub financial_breakdown: Option<serde_json::Value>,
}

impl DocumentRecord {
    pub fn invoice_status(&self) -> InvoiceStatus {
        InvoiceStatus::from_string(&self.status)
    }

    pub fn invoice_type(&self) -> Option<InvoiceType> {
        self.invoice_type.as_deref().map(InvoiceType::from_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_exact() {
        assert_eq!(InvoiceStatus::from_string("Paid"), InvoiceStatus::Paid);
        assert_eq!(InvoiceStatus::from_string("PAID"), InvoiceStatus::Other);
        assert_eq!(InvoiceStatus::from_string("paid"), InvoiceStatus::Other);
        assert_eq!(InvoiceStatus::from_string(" Paid"), InvoiceStatus::Other);
        assert_eq!(InvoiceStatus::from_string("Draft"), InvoiceStatus::Draft);
        assert_eq!(InvoiceStatus::from_string("Partially Paid"), InvoiceStatus::Other);
    }

    #[test]
    fn unknown_invoice_types_are_direct() {
        assert_eq!(InvoiceType::from_string("AGAINST_PO"), InvoiceType::AgainstPo);
        assert_eq!(
            InvoiceType::from_string("against-holdback-amount"),
            InvoiceType::HoldbackRelease
        );
        assert_eq!(InvoiceType::from_string("whatever"), InvoiceType::DirectInvoice);
    }
}
