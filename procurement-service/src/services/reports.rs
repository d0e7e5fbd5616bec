//! AP summary report assembly: concurrent store reads, then aggregation.

use crate::engine::{summarize, ApSummaryInput};
use crate::models::{ApSummaryReport, DocumentKind, DocumentRecord};
use crate::services::metrics::{AP_REPORT_DURATION, MALFORMED_BREAKDOWNS_TOTAL};
use crate::services::store::{DocumentFilter, DocumentStore};
use chrono::NaiveDate;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Parameters of one AP summary request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApSummaryQuery {
    pub corporation_uuid: Uuid,
    pub project_uuid: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Clone)]
pub struct ApSummaryService {
    store: Arc<dyn DocumentStore>,
}

impl ApSummaryService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Build the AP summary. Fails with `NotFound` when the project does not
    /// belong to the corporation; unreadable breakdowns are counted, not fatal.
    #[instrument(
        skip(self),
        fields(
            corporation_uuid = %query.corporation_uuid,
            project_uuid = %query.project_uuid,
            start_date = %query.start_date,
            end_date = %query.end_date
        )
    )]
    pub async fn ap_summary(&self, query: ApSummaryQuery) -> Result<ApSummaryReport, AppError> {
        let timer = AP_REPORT_DURATION.start_timer();

        let orders = DocumentFilter::new(query.corporation_uuid, query.project_uuid);
        let invoices = orders.between(query.start_date, query.end_date);

        let (project, vendors, purchase_orders, change_orders, invoices) = tokio::try_join!(
            self.store
                .find_project(query.corporation_uuid, query.project_uuid),
            self.store.list_vendors(query.corporation_uuid),
            self.store.list_orders(DocumentKind::PurchaseOrder, &orders),
            self.store.list_orders(DocumentKind::ChangeOrder, &orders),
            self.store.list_vendor_invoices(&invoices),
        )?;

        let project = project
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Project not found")))?;

        debug!(
            vendors = vendors.len(),
            purchase_orders = purchase_orders.len(),
            change_orders = change_orders.len(),
            invoices = invoices.len(),
            invoice_types = ?invoice_type_counts(&invoices),
            "Documents loaded for AP summary"
        );

        let outcome = summarize(ApSummaryInput {
            project: &project,
            vendors: &vendors,
            purchase_orders: &purchase_orders,
            change_orders: &change_orders,
            invoices: &invoices,
        });

        if outcome.malformed.total() > 0 {
            for kind in [
                DocumentKind::PurchaseOrder,
                DocumentKind::ChangeOrder,
                DocumentKind::VendorInvoice,
            ] {
                let count = outcome.malformed.get(kind);
                if count > 0 {
                    MALFORMED_BREAKDOWNS_TOTAL
                        .with_label_values(&[kind.as_str()])
                        .inc_by(count as f64);
                }
            }
            warn!(
                malformed = outcome.malformed.total(),
                "Unreadable or out-of-range financial breakdowns treated as zero"
            );
        }

        timer.observe_duration();

        info!(
            vendor_rows = outcome.report.vendors.len(),
            po_amount = %outcome.report.totals.po_amount,
            paid_to_date = %outcome.report.totals.paid_to_date,
            "AP summary built"
        );

        Ok(outcome.report)
    }
}

fn invoice_type_counts(invoices: &[DocumentRecord]) -> HashMap<&'static str, usize> {
    let mut counts = HashMap::new();
    for invoice in invoices {
        let kind = invoice
            .invoice_type()
            .map(|invoice_type| invoice_type.as_str())
            .unwrap_or("unspecified");
        *counts.entry(kind).or_insert(0) += 1;
    }
    counts
}
