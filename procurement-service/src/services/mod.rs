//! Service layer for procurement-service.

pub mod database;
pub mod memory;
pub mod metrics;
pub mod reports;
pub mod store;

pub use database::PgDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use metrics::{get_metrics, init_metrics};
pub use reports::{ApSummaryQuery, ApSummaryService};
pub use store::{DocumentFilter, DocumentStore};
