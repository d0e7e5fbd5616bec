//! Tax-eligible base of a single item.

use crate::engine::proration::ChargeAmounts;
use crate::models::money::{checked_add, MoneyResult};
use crate::models::{ChargeKind, ChargeSettings};
use rust_decimal::Decimal;

/// Goods amount plus every charge whose document-level `taxable` flag is set.
pub fn taxable_base(
    goods: Decimal,
    charges: &ChargeAmounts,
    settings: &ChargeSettings,
) -> MoneyResult<Decimal> {
    ChargeKind::ALL
        .into_iter()
        .filter(|kind| settings.is_taxable(*kind))
        .try_fold(goods, |base, kind| checked_add(base, charges.get(kind)))
}
