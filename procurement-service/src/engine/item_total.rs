//! Per-item composition of goods, charges and tax.

use crate::engine::proration::ChargeAmounts;
use crate::engine::sales_tax::{sales_tax, SalesTax};
use crate::engine::taxable_base::taxable_base;
use crate::models::money::{checked_add, round_money, MoneyResult};
use crate::models::{ChargeSettings, LineItem, TaxConfig};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Everything computed for one line item.
///
/// Values are kept at full precision while documents are summed; call
/// [`ItemBreakdown::rounded`] before handing the item to a caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemBreakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    pub goods_amount: Decimal,
    /// Amount shown on the line; the persisted total for unpriced lines.
    pub line_total: Decimal,
    pub charges: ChargeAmounts,
    pub taxable_base: Decimal,
    pub sales_tax_1: Decimal,
    pub sales_tax_2: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
}

impl ItemBreakdown {
    pub fn rounded(&self) -> Self {
        Self {
            uuid: self.uuid,
            goods_amount: round_money(self.goods_amount),
            line_total: self.line_total,
            charges: ChargeAmounts {
                freight: round_money(self.charges.freight),
                packing: round_money(self.charges.packing),
                custom_duties: round_money(self.charges.custom_duties),
                other: round_money(self.charges.other),
            },
            taxable_base: round_money(self.taxable_base),
            sales_tax_1: round_money(self.sales_tax_1),
            sales_tax_2: round_money(self.sales_tax_2),
            tax_total: round_money(self.tax_total),
            total: round_money(self.total),
        }
    }
}

/// `goods + freight + packing + custom_duties + other + tax`.
pub fn item_total(
    goods: Decimal,
    charges: &ChargeAmounts,
    tax: &SalesTax,
) -> MoneyResult<Decimal> {
    checked_add(checked_add(goods, charges.total()?)?, tax.total()?)
}

/// Evaluate one item given its goods amount and already-prorated charges.
pub fn compute_item(
    item: &LineItem,
    goods: Decimal,
    charges: ChargeAmounts,
    settings: &ChargeSettings,
    taxes: &TaxConfig,
) -> MoneyResult<ItemBreakdown> {
    let base = taxable_base(goods, &charges, settings)?;
    let tax = sales_tax(base, taxes)?;

    Ok(ItemBreakdown {
        uuid: item.uuid,
        goods_amount: goods,
        line_total: item.display_total()?,
        charges,
        taxable_base: base,
        sales_tax_1: tax.sales_tax_1,
        sales_tax_2: tax.sales_tax_2,
        tax_total: tax.total()?,
        total: item_total(goods, &charges, &tax)?,
    })
}
