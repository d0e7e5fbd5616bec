//! Document-level roll-up producing the persisted [`FinancialBreakdown`].

use crate::engine::item_total::{compute_item, ItemBreakdown};
use crate::engine::proration::{prorate_charges, GoodsBasis};
use crate::models::money::{checked_add, checked_sum, round_money, MoneyResult};
use crate::models::{
    BreakdownTotals, ChargeBreakdown, ChargeKind, ChargeLine, ChargeSettings, DocumentKind,
    FinancialBreakdown, LineItem, SalesTaxBreakdown, TaxConfig, TaxLine, TaxSlot,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// Per-item figures plus the document breakdown, as returned to the edit
/// surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownResult {
    pub items: Vec<ItemBreakdown>,
    pub financial_breakdown: FinancialBreakdown,
}

/// Compute every item and the document totals for one document.
///
/// Sums are taken over full-precision item values and rounded once, so the
/// result does not drift with the number of items. Fails when any amount
/// leaves the range a `Decimal` can hold.
pub fn compute_breakdown(
    kind: DocumentKind,
    items: &[LineItem],
    settings: &ChargeSettings,
    taxes: &TaxConfig,
) -> MoneyResult<BreakdownResult> {
    let basis = GoodsBasis::from_items(items)?;
    let charges = prorate_charges(items, settings, &basis)?;

    let computed = items
        .iter()
        .zip(charges)
        .enumerate()
        .map(|(index, (item, charges))| {
            compute_item(item, basis.amount(index), charges, settings, taxes)
        })
        .collect::<MoneyResult<Vec<ItemBreakdown>>>()?;

    let financial_breakdown = summarize(kind, &basis, &computed, settings, taxes)?;

    Ok(BreakdownResult {
        items: computed.iter().map(ItemBreakdown::rounded).collect(),
        financial_breakdown,
    })
}

fn summarize(
    kind: DocumentKind,
    basis: &GoodsBasis,
    items: &[ItemBreakdown],
    settings: &ChargeSettings,
    taxes: &TaxConfig,
) -> MoneyResult<FinancialBreakdown> {
    let mut charges = ChargeBreakdown::default();
    let mut charges_total = Decimal::ZERO;
    for kind in ChargeKind::ALL {
        let sum = checked_sum(items.iter().map(|item| item.charges.get(kind)))?;
        let config = settings.get(kind);
        *charges.get_mut(kind) = ChargeLine {
            percentage: config.percentage,
            amount: round_money(sum),
            taxable: config.taxable,
        };
        charges_total = checked_add(charges_total, sum)?;
    }

    let tax_line = |slot: TaxSlot| -> MoneyResult<TaxLine> {
        let sum = checked_sum(items.iter().map(|item| match slot {
            TaxSlot::SalesTax1 => item.sales_tax_1,
            TaxSlot::SalesTax2 => item.sales_tax_2,
        }))?;
        Ok(TaxLine {
            percentage: taxes.percentage(slot),
            amount: round_money(sum),
        })
    };
    let sales_taxes = SalesTaxBreakdown {
        sales_tax_1: tax_line(TaxSlot::SalesTax1)?,
        sales_tax_2: tax_line(TaxSlot::SalesTax2)?,
    };

    let tax_total = checked_sum(items.iter().map(|item| item.tax_total))?;
    let grand_total = checked_sum(items.iter().map(|item| item.total))?;

    Ok(FinancialBreakdown {
        charges,
        sales_taxes,
        totals: BreakdownTotals::new(
            kind,
            round_money(basis.total()),
            round_money(charges_total),
            round_money(tax_total),
            round_money(grand_total),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::money::AmountOverflow;
    use crate::models::{ChargeConfig, TaxRate};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn taxes(p1: &str, p2: Option<&str>) -> TaxConfig {
        TaxConfig {
            sales_tax_1: TaxRate {
                percentage: Some(dec(p1)),
            },
            sales_tax_2: TaxRate {
                percentage: p2.map(dec),
            },
        }
    }

    #[test]
    fn purchase_order_with_taxable_freight() {
        let items = vec![LineItem::new(dec("10"), dec("100"))];
        let settings = ChargeSettings {
            freight: ChargeConfig {
                percentage: Some(dec("5")),
                fixed_amount: None,
                taxable: true,
            },
            ..ChargeSettings::default()
        };

        let result = compute_breakdown(
            DocumentKind::PurchaseOrder,
            &items,
            &settings,
            &taxes("13", None),
        )
        .unwrap();
        let breakdown = &result.financial_breakdown;

        assert_eq!(breakdown.charges.freight.amount, dec("50"));
        assert!(breakdown.charges.freight.taxable);
        assert_eq!(breakdown.sales_taxes.sales_tax_1.amount, dec("136.5"));
        assert_eq!(breakdown.totals.item_total, dec("1000"));
        assert_eq!(breakdown.totals.charges_total, dec("50"));
        assert_eq!(breakdown.totals.tax_total, dec("136.5"));
        assert_eq!(breakdown.totals.total_po_amount, Some(dec("1186.5")));
        assert_eq!(breakdown.totals.total_co_amount, None);
        assert_eq!(result.items[0].total, dec("1186.5"));
    }

    #[test]
    fn fixed_charge_total_is_preserved_across_items() {
        let items = vec![
            LineItem::new(dec("1"), dec("33.33")),
            LineItem::new(dec("1"), dec("33.33")),
            LineItem::new(dec("1"), dec("33.34")),
        ];
        let settings = ChargeSettings {
            packing: ChargeConfig {
                percentage: None,
                fixed_amount: Some(dec("10")),
                taxable: false,
            },
            ..ChargeSettings::default()
        };

        let result = compute_breakdown(
            DocumentKind::ChangeOrder,
            &items,
            &settings,
            &TaxConfig::default(),
        )
        .unwrap();
        let totals = &result.financial_breakdown.totals;

        assert_eq!(result.financial_breakdown.charges.packing.amount, dec("10.00"));
        assert_eq!(totals.charges_total, dec("10.00"));
        assert_eq!(totals.total_co_amount, Some(dec("110.00")));
    }

    #[test]
    fn grand_total_is_goods_plus_charges_plus_tax() {
        let mut items = vec![
            LineItem::new(dec("3"), dec("19.99")),
            LineItem::new(dec("2"), dec("250")),
        ];
        items[1].other_amount = Some(dec("12.5"));
        let settings = ChargeSettings {
            freight: ChargeConfig {
                percentage: None,
                fixed_amount: Some(dec("40")),
                taxable: true,
            },
            other: ChargeConfig {
                percentage: Some(dec("2")),
                fixed_amount: None,
                taxable: false,
            },
            ..ChargeSettings::default()
        };

        let result = compute_breakdown(
            DocumentKind::VendorInvoice,
            &items,
            &settings,
            &taxes("6", Some("8")),
        )
        .unwrap();
        let totals = &result.financial_breakdown.totals;
        let grand = totals.grand_total(DocumentKind::VendorInvoice);

        assert_eq!(totals.item_total, dec("559.97"));
        let parts = totals.item_total + totals.charges_total + totals.tax_total;
        assert!((parts - grand).abs() <= dec("0.01"));
        assert_eq!(
            result.financial_breakdown.sales_taxes.sales_tax_1.amount
                + result.financial_breakdown.sales_taxes.sales_tax_2.amount,
            totals.tax_total
        );
    }

    #[test]
    fn recomputation_is_byte_identical() {
        let items = vec![
            LineItem::new(dec("7"), dec("13.37")),
            LineItem::new(dec("0.5"), dec("99.99")),
        ];
        let settings = ChargeSettings {
            custom_duties: ChargeConfig {
                percentage: None,
                fixed_amount: Some(dec("17.17")),
                taxable: true,
            },
            ..ChargeSettings::default()
        };
        let tax = taxes("13", None);

        let kind = DocumentKind::PurchaseOrder;
        let first = compute_breakdown(kind, &items, &settings, &tax).unwrap();
        let second = compute_breakdown(kind, &items, &settings, &tax).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn empty_document_is_all_zero() {
        let result = compute_breakdown(
            DocumentKind::PurchaseOrder,
            &[],
            &ChargeSettings::default(),
            &TaxConfig::default(),
        )
        .unwrap();

        assert!(result.items.is_empty());
        assert_eq!(
            result.financial_breakdown.totals.total_po_amount,
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn amounts_past_decimal_range_are_rejected() {
        let huge = LineItem::new(dec("1000000000000000"), dec("1000000000000000"));

        let result = compute_breakdown(
            DocumentKind::PurchaseOrder,
            &[huge],
            &ChargeSettings::default(),
            &TaxConfig::default(),
        );

        assert_eq!(result, Err(AmountOverflow));
    }

    #[test]
    fn document_sum_past_decimal_range_is_rejected() {
        let half = dec("50000000000000000000000000000");
        let items = vec![LineItem::new(Decimal::ONE, half), LineItem::new(Decimal::ONE, half)];

        let result = compute_breakdown(
            DocumentKind::ChangeOrder,
            &items,
            &ChargeSettings::default(),
            &TaxConfig::default(),
        );

        assert_eq!(result, Err(AmountOverflow));
    }
}
