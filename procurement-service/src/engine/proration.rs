//! Per-item distribution of document-level charges.
//!
//! For every item and charge kind the amount is resolved in this order:
//!
//! 1. an explicit item override (`freight_amount`, ...) is used verbatim;
//! 2. a percentage charge applies to the item's own goods amount;
//! 3. a fixed charge is split by the item's share of the document's goods;
//! 4. otherwise the charge is zero.

use crate::models::money::{checked_mul, checked_sum, percent_of, AmountOverflow, MoneyResult};
use crate::models::{ChargeConfig, ChargeKind, ChargeSettings, LineItem};
use rust_decimal::Decimal;
use serde::Serialize;

/// Goods amounts of one document, with the document-wide sum computed once.
#[derive(Debug, Clone, PartialEq)]
pub struct GoodsBasis {
    amounts: Vec<Decimal>,
    total: Decimal,
}

impl GoodsBasis {
    pub fn from_items(items: &[LineItem]) -> MoneyResult<Self> {
        let amounts = items
            .iter()
            .map(LineItem::goods_amount)
            .collect::<MoneyResult<Vec<Decimal>>>()?;
        let total = checked_sum(amounts.iter().copied())?;
        Ok(Self { amounts, total })
    }

    pub fn amount(&self, index: usize) -> Decimal {
        self.amounts.get(index).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Portion of `fixed` attributable to the item at `index`.
    fn prorated(&self, index: usize, fixed: Decimal) -> MoneyResult<Decimal> {
        if self.total.is_zero() {
            return Ok(Decimal::ZERO);
        }
        checked_mul(fixed, self.amount(index))?
            .checked_div(self.total)
            .ok_or(AmountOverflow)
    }
}

/// One item's amount for each charge kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChargeAmounts {
    pub freight: Decimal,
    pub packing: Decimal,
    pub custom_duties: Decimal,
    pub other: Decimal,
}

impl ChargeAmounts {
    pub fn get(&self, kind: ChargeKind) -> Decimal {
        match kind {
            ChargeKind::Freight => self.freight,
            ChargeKind::Packing => self.packing,
            ChargeKind::CustomDuties => self.custom_duties,
            ChargeKind::Other => self.other,
        }
    }

    fn set(&mut self, kind: ChargeKind, amount: Decimal) {
        match kind {
            ChargeKind::Freight => self.freight = amount,
            ChargeKind::Packing => self.packing = amount,
            ChargeKind::CustomDuties => self.custom_duties = amount,
            ChargeKind::Other => self.other = amount,
        }
    }

    pub fn total(&self) -> MoneyResult<Decimal> {
        checked_sum([self.freight, self.packing, self.custom_duties, self.other])
    }
}

/// Charge of one kind for the item at `index`.
pub fn item_charge(
    kind: ChargeKind,
    config: &ChargeConfig,
    item: &LineItem,
    index: usize,
    basis: &GoodsBasis,
) -> MoneyResult<Decimal> {
    if let Some(amount) = item.charge_override(kind) {
        return Ok(amount);
    }
    if let Some(percentage) = config.effective_percentage() {
        return percent_of(basis.amount(index), Some(percentage));
    }
    match config.fixed_amount {
        Some(fixed) => basis.prorated(index, fixed),
        None => Ok(Decimal::ZERO),
    }
}

/// Charges of one kind for every item, in item order.
pub fn prorate_charge(
    kind: ChargeKind,
    config: &ChargeConfig,
    items: &[LineItem],
    basis: &GoodsBasis,
) -> MoneyResult<Vec<Decimal>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| item_charge(kind, config, item, index, basis))
        .collect()
}

/// All four charge kinds for every item, in item order.
pub fn prorate_charges(
    items: &[LineItem],
    settings: &ChargeSettings,
    basis: &GoodsBasis,
) -> MoneyResult<Vec<ChargeAmounts>> {
    let mut per_item = vec![ChargeAmounts::default(); items.len()];
    for kind in ChargeKind::ALL {
        let amounts = prorate_charge(kind, settings.get(kind), items, basis)?;
        for (charges, amount) in per_item.iter_mut().zip(amounts) {
            charges.set(kind, amount);
        }
    }
    Ok(per_item)
}
