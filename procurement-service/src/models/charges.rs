//! Charge and sales-tax configuration carried by a PO, CO or direct invoice.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Document-level add-on cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeKind {
    Freight,
    Packing,
    CustomDuties,
    Other,
}

impl ChargeKind {
    /// Evaluation and serialization order.
    pub const ALL: [ChargeKind; 4] = [
        ChargeKind::Freight,
        ChargeKind::Packing,
        ChargeKind::CustomDuties,
        ChargeKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeKind::Freight => "freight",
            ChargeKind::Packing => "packing",
            ChargeKind::CustomDuties => "custom_duties",
            ChargeKind::Other => "other",
        }
    }
}

/// How one charge kind is applied to a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeConfig {
    #[serde(default)]
    pub percentage: Option<Decimal>,
    #[serde(default, alias = "fixedAmount")]
    pub fixed_amount: Option<Decimal>,
    #[serde(default)]
    pub taxable: bool,
}

impl ChargeConfig {
    /// A zero or missing percentage counts as not set, so the fixed amount
    /// (if any) applies instead.
    pub fn effective_percentage(&self) -> Option<Decimal> {
        self.percentage.filter(|p| !p.is_zero())
    }
}

/// One [`ChargeConfig`] per [`ChargeKind`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeSettings {
    #[serde(default)]
    pub freight: ChargeConfig,
    #[serde(default)]
    pub packing: ChargeConfig,
    #[serde(default, alias = "customs_duties")]
    pub custom_duties: ChargeConfig,
    #[serde(default)]
    pub other: ChargeConfig,
}

impl ChargeSettings {
    pub fn get(&self, kind: ChargeKind) -> &ChargeConfig {
        match kind {
            ChargeKind::Freight => &self.freight,
            ChargeKind::Packing => &self.packing,
            ChargeKind::CustomDuties => &self.custom_duties,
            ChargeKind::Other => &self.other,
        }
    }

    pub fn is_taxable(&self, kind: ChargeKind) -> bool {
        self.get(kind).taxable
    }
}

/// The two independent sales-tax slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxSlot {
    SalesTax1,
    SalesTax2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxRate {
    #[serde(default)]
    pub percentage: Option<Decimal>,
}

/// Sales-tax configuration. Both slots apply to the same taxable base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxConfig {
    #[serde(default)]
    pub sales_tax_1: TaxRate,
    #[serde(default)]
    pub sales_tax_2: TaxRate,
}

impl TaxConfig {
    pub fn percentage(&self, slot: TaxSlot) -> Option<Decimal> {
        match slot {
            TaxSlot::SalesTax1 => self.sales_tax_1.percentage,
            TaxSlot::SalesTax2 => self.sales_tax_2.percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_camel_case_fixed_amount() {
        let settings: ChargeSettings = serde_json::from_value(json!({
            "freight": {"fixedAmount": 100, "taxable": true},
            "packing": {"percentage": 2.5}
        }))
        .unwrap();

        assert_eq!(settings.freight.fixed_amount, Some(Decimal::from(100)));
        assert!(settings.freight.taxable);
        assert_eq!(settings.packing.percentage, Some(Decimal::new(25, 1)));
        assert!(!settings.packing.taxable);
        assert_eq!(settings.other, ChargeConfig::default());
    }

    #[test]
    fn zero_percentage_is_not_effective() {
        let config = ChargeConfig {
            percentage: Some(Decimal::ZERO),
            fixed_amount: Some(Decimal::from(50)),
            taxable: false,
        };
        assert_eq!(config.effective_percentage(), None);
    }
}
