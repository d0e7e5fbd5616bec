//! Two-slot sales tax. Both rates apply to the same base; neither is taxed
//! by the other.

use crate::models::money::{checked_add, percent_of, MoneyResult};
use crate::models::{TaxConfig, TaxSlot};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SalesTax {
    pub sales_tax_1: Decimal,
    pub sales_tax_2: Decimal,
}

impl SalesTax {
    pub fn total(&self) -> MoneyResult<Decimal> {
        checked_add(self.sales_tax_1, self.sales_tax_2)
    }
}

/// Apply both configured rates to `base`. An unset rate yields zero.
pub fn sales_tax(base: Decimal, config: &TaxConfig) -> MoneyResult<SalesTax> {
    Ok(SalesTax {
        sales_tax_1: percent_of(base, config.percentage(TaxSlot::SalesTax1))?,
        sales_tax_2: percent_of(base, config.percentage(TaxSlot::SalesTax2))?,
    })
}
