//! Line item model for procurement documents.

use crate::models::charges::ChargeKind;
use crate::models::money::{checked_mul, round_money, MoneyResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Line item on a PO, CO or invoice, as submitted by the edit forms.
///
/// Numeric fields are nullable on the wire; a missing value counts as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    /// Persisted total, only shown when quantity and unit price are absent.
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub freight_amount: Option<Decimal>,
    #[serde(default)]
    pub packing_amount: Option<Decimal>,
    #[serde(default, alias = "customs_duties_amount")]
    pub custom_duties_amount: Option<Decimal>,
    #[serde(default)]
    pub other_amount: Option<Decimal>,
}

impl LineItem {
    pub fn new(quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            quantity: Some(quantity),
            unit_price: Some(unit_price),
            ..Self::default()
        }
    }

    /// `quantity * unit_price`, rounded to cents.
    pub fn goods_amount(&self) -> MoneyResult<Decimal> {
        let quantity = self.quantity.unwrap_or(Decimal::ZERO);
        let unit_price = self.unit_price.unwrap_or(Decimal::ZERO);
        checked_mul(quantity, unit_price).map(round_money)
    }

    /// Explicit per-item amount that replaces the computed charge.
    pub fn charge_override(&self, kind: ChargeKind) -> Option<Decimal> {
        match kind {
            ChargeKind::Freight => self.freight_amount,
            ChargeKind::Packing => self.packing_amount,
            ChargeKind::CustomDuties => self.custom_duties_amount,
            ChargeKind::Other => self.other_amount,
        }
    }

    /// Amount shown in item tables.
    pub fn display_total(&self) -> MoneyResult<Decimal> {
        if self.quantity.is_none() && self.unit_price.is_none() {
            return Ok(self.total.map(round_money).unwrap_or(Decimal::ZERO));
        }
        self.goods_amount()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::money::AmountOverflow;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn goods_amount_treats_missing_values_as_zero() {
        let item = LineItem {
            quantity: Some(dec("3")),
            ..LineItem::default()
        };
        assert_eq!(item.goods_amount(), Ok(Decimal::ZERO));
    }

    #[test]
    fn goods_amount_rounds_half_up() {
        let item = LineItem::new(dec("3"), dec("0.335"));
        assert_eq!(item.goods_amount(), Ok(dec("1.01")));
    }

    #[test]
    fn negative_prices_propagate() {
        let item = LineItem::new(dec("2"), dec("-12.50"));
        assert_eq!(item.goods_amount(), Ok(dec("-25.00")));
    }

    #[test]
    fn display_total_falls_back_to_persisted_total() {
        let item = LineItem {
            total: Some(dec("480.00")),
            ..LineItem::default()
        };
        assert_eq!(item.display_total(), Ok(dec("480.00")));

        let priced = LineItem {
            total: Some(dec("480.00")),
            ..LineItem::new(dec("2"), dec("100"))
        };
        assert_eq!(priced.display_total(), Ok(dec("200")));
    }

    #[test]
    fn oversized_goods_amount_is_an_error() {
        let item = LineItem::new(dec("1000000000000000"), dec("1000000000000000"));
        assert_eq!(item.goods_amount(), Err(AmountOverflow));
    }
}
