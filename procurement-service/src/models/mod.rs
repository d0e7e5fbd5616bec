//! Domain models for procurement-service.

mod breakdown;
mod charges;
mod document;
mod line_item;
pub mod money;
mod report;

pub use breakdown::{
    BreakdownTotals, ChargeBreakdown, ChargeLine, DocumentKind, FinancialBreakdown,
    NormalizedBreakdown, SalesTaxBreakdown, TaxLine,
};
pub use charges::{ChargeConfig, ChargeKind, ChargeSettings, TaxConfig, TaxRate, TaxSlot};
pub use document::{DocumentRecord, InvoiceStatus, InvoiceType, Project, Vendor};
pub use line_item::LineItem;
pub use report::{ApAmounts, ApSummaryReport, ProjectSummary, VendorApSummaryRow};
