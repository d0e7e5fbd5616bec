//! The `financial_breakdown` value persisted on every procurement document.

use crate::models::charges::ChargeKind;
use crate::models::money::{decimal_from_value, optional_decimal_from_value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Which kind of document a breakdown belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PurchaseOrder,
    ChangeOrder,
    VendorInvoice,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::PurchaseOrder => "purchase_order",
            DocumentKind::ChangeOrder => "change_order",
            DocumentKind::VendorInvoice => "vendor_invoice",
        }
    }

    /// Storage table backing this kind.
    pub fn table(&self) -> &'static str {
        match self {
            DocumentKind::PurchaseOrder => "purchase_orders",
            DocumentKind::ChangeOrder => "change_orders",
            DocumentKind::VendorInvoice => "vendor_invoices",
        }
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    /// Accepts the snake-case name and the URL segment (`purchase-orders`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "purchase_order" | "purchase_orders" => Ok(DocumentKind::PurchaseOrder),
            "change_order" | "change_orders" => Ok(DocumentKind::ChangeOrder),
            "vendor_invoice" | "vendor_invoices" => Ok(DocumentKind::VendorInvoice),
            _ => Err(format!("Invalid document kind: {}", s)),
        }
    }
}

/// Document-level figure for one charge kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeLine {
    pub percentage: Option<Decimal>,
    pub amount: Decimal,
    pub taxable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    pub freight: ChargeLine,
    pub packing: ChargeLine,
    pub custom_duties: ChargeLine,
    pub other: ChargeLine,
}

impl ChargeBreakdown {
    pub fn get_mut(&mut self, kind: ChargeKind) -> &mut ChargeLine {
        match kind {
            ChargeKind::Freight => &mut self.freight,
            ChargeKind::Packing => &mut self.packing,
            ChargeKind::CustomDuties => &mut self.custom_duties,
            ChargeKind::Other => &mut self.other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub percentage: Option<Decimal>,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTaxBreakdown {
    pub sales_tax_1: TaxLine,
    pub sales_tax_2: TaxLine,
}

/// Document totals. `item_total` is the goods subtotal; exactly one of the
/// kind-specific grand totals is written, the others stay absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakdownTotals {
    pub item_total: Decimal,
    pub charges_total: Decimal,
    pub tax_total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_po_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_co_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_invoice_amount: Option<Decimal>,
}

impl BreakdownTotals {
    pub fn new(
        kind: DocumentKind,
        item_total: Decimal,
        charges_total: Decimal,
        tax_total: Decimal,
        grand_total: Decimal,
    ) -> Self {
        let mut totals = Self {
            item_total,
            charges_total,
            tax_total,
            ..Self::default()
        };
        *totals.grand_total_slot(kind) = Some(grand_total);
        totals
    }

    /// The grand total for `kind`; zero when the breakdown never recorded one.
    pub fn grand_total(&self, kind: DocumentKind) -> Decimal {
        match kind {
            DocumentKind::PurchaseOrder => self.total_po_amount,
            DocumentKind::ChangeOrder => self.total_co_amount,
            DocumentKind::VendorInvoice => self.total_invoice_amount,
        }
        .unwrap_or(Decimal::ZERO)
    }

    fn grand_total_slot(&mut self, kind: DocumentKind) -> &mut Option<Decimal> {
        match kind {
            DocumentKind::PurchaseOrder => &mut self.total_po_amount,
            DocumentKind::ChangeOrder => &mut self.total_co_amount,
            DocumentKind::VendorInvoice => &mut self.total_invoice_amount,
        }
    }
}

/// Computed charges, taxes and totals of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialBreakdown {
    pub charges: ChargeBreakdown,
    pub sales_taxes: SalesTaxBreakdown,
    pub totals: BreakdownTotals,
}

/// Result of reading a stored breakdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBreakdown {
    pub breakdown: FinancialBreakdown,
    /// The stored value could not be read at all and was treated as empty.
    pub malformed: bool,
}

impl FinancialBreakdown {
    /// Read a breakdown as stored: JSON object, JSON-encoded string, or
    /// nothing. Missing or unreadable numbers become zero; this never fails.
    pub fn normalize_stored(raw: Option<&Value>) -> NormalizedBreakdown {
        match raw {
            None | Some(Value::Null) => NormalizedBreakdown::default(),
            Some(value @ Value::Object(_)) => NormalizedBreakdown {
                breakdown: Self::from_object(value),
                malformed: false,
            },
            Some(Value::String(text)) if text.trim().is_empty() => NormalizedBreakdown::default(),
            Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
                Ok(Value::String(_)) | Err(_) => NormalizedBreakdown {
                    breakdown: FinancialBreakdown::default(),
                    malformed: true,
                },
                Ok(parsed) => Self::normalize_stored(Some(&parsed)),
            },
            Some(_) => NormalizedBreakdown {
                breakdown: FinancialBreakdown::default(),
                malformed: true,
            },
        }
    }

    fn from_object(value: &Value) -> Self {
        let charges_raw = &value["charges"];
        let mut charges = ChargeBreakdown::default();
        for kind in ChargeKind::ALL {
            let raw = match &charges_raw[kind.as_str()] {
                Value::Null if kind == ChargeKind::CustomDuties => &charges_raw["customs_duties"],
                other => other,
            };
            *charges.get_mut(kind) = ChargeLine {
                percentage: optional_decimal_from_value(&raw["percentage"]),
                amount: decimal_from_value(&raw["amount"]),
                taxable: raw["taxable"].as_bool().unwrap_or(false),
            };
        }

        let taxes_raw = &value["sales_taxes"];
        let tax_line = |key: &str| TaxLine {
            percentage: optional_decimal_from_value(&taxes_raw[key]["percentage"]),
            amount: decimal_from_value(&taxes_raw[key]["amount"]),
        };

        let totals_raw = &value["totals"];
        Self {
            charges,
            sales_taxes: SalesTaxBreakdown {
                sales_tax_1: tax_line("sales_tax_1"),
                sales_tax_2: tax_line("sales_tax_2"),
            },
            totals: BreakdownTotals {
                item_total: decimal_from_value(&totals_raw["item_total"]),
                charges_total: decimal_from_value(&totals_raw["charges_total"]),
                tax_total: decimal_from_value(&totals_raw["tax_total"]),
                total_po_amount: optional_decimal_from_value(&totals_raw["total_po_amount"]),
                total_co_amount: optional_decimal_from_value(&totals_raw["total_co_amount"]),
                total_invoice_amount: optional_decimal_from_value(
                    &totals_raw["total_invoice_amount"],
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "charges": {
                "freight": {"percentage": 5, "amount": 50, "taxable": true}
            },
            "sales_taxes": {
                "sales_tax_1": {"percentage": 13, "amount": 136.5}
            },
            "totals": {
                "item_total": 1000,
                "charges_total": 50,
                "tax_total": 136.5,
                "total_po_amount": 1186.5
            }
        })
    }

    #[test]
    fn object_and_string_forms_read_the_same() {
        let object = sample();
        let text = Value::String(object.to_string());

        let from_object = FinancialBreakdown::normalize_stored(Some(&object));
        let from_text = FinancialBreakdown::normalize_stored(Some(&text));

        assert!(!from_object.malformed);
        assert_eq!(from_object, from_text);
        assert_eq!(
            from_object.breakdown.totals.grand_total(DocumentKind::PurchaseOrder),
            Decimal::new(11865, 1)
        );
        assert!(from_object.breakdown.charges.freight.taxable);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let partial = json!({"totals": {"total_invoice_amount": "2500.00"}});
        let normalized = FinancialBreakdown::normalize_stored(Some(&partial));

        assert!(!normalized.malformed);
        let totals = &normalized.breakdown.totals;
        assert_eq!(totals.tax_total, Decimal::ZERO);
        assert_eq!(
            totals.grand_total(DocumentKind::VendorInvoice),
            Decimal::new(2500, 0)
        );
        assert_eq!(totals.grand_total(DocumentKind::PurchaseOrder), Decimal::ZERO);
        assert_eq!(normalized.breakdown.charges.packing, ChargeLine::default());
    }

    #[test]
    fn unparsable_values_are_flagged_not_fatal() {
        for raw in [json!("{not json"), json!(42), json!([1, 2]), json!("\"nested\"")] {
            let normalized = FinancialBreakdown::normalize_stored(Some(&raw));
            assert!(normalized.malformed, "expected malformed for {raw}");
            assert_eq!(normalized.breakdown, FinancialBreakdown::default());
        }
    }

    #[test]
    fn absent_breakdown_is_empty_not_malformed() {
        assert!(!FinancialBreakdown::normalize_stored(None).malformed);
        assert!(!FinancialBreakdown::normalize_stored(Some(&json!(null))).malformed);
        assert!(!FinancialBreakdown::normalize_stored(Some(&json!(""))).malformed);
    }

    #[test]
    fn totals_serialize_only_the_kind_total() {
        let totals = BreakdownTotals::new(
            DocumentKind::ChangeOrder,
            Decimal::from(100),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::from(100),
        );
        let value = serde_json::to_value(&totals).unwrap();
        assert!(value.get("total_co_amount").is_some());
        assert!(value.get("total_po_amount").is_none());
        assert!(value.get("total_invoice_amount").is_none());
    }

    #[test]
    fn parses_url_segments() {
        assert_eq!(
            "purchase-orders".parse::<DocumentKind>().unwrap(),
            DocumentKind::PurchaseOrder
        );
        assert_eq!(
            "vendor_invoice".parse::<DocumentKind>().unwrap(),
            DocumentKind::VendorInvoice
        );
        assert!("receipt-notes".parse::<DocumentKind>().is_err());
    }
}
