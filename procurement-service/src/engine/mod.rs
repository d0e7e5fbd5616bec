//! Pure monetary calculations: document breakdowns and the AP summary.

pub mod ap_summary;
pub mod document_totals;
pub mod item_total;
pub mod proration;
pub mod sales_tax;
pub mod taxable_base;

pub use ap_summary::{summarize, ApSummaryInput, ApSummaryOutcome, MalformedCounts};
pub use document_totals::{compute_breakdown, BreakdownResult};
pub use item_total::ItemBreakdown;
pub use proration::{ChargeAmounts, GoodsBasis};
