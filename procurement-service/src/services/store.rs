//! Persistence seam for projects, vendors and procurement documents.

use crate::models::{DocumentKind, DocumentRecord, FinancialBreakdown, Project, Vendor};
use async_trait::async_trait;
use chrono::NaiveDate;
use service_core::error::AppError;
use uuid::Uuid;

/// Scope of a document listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentFilter {
    pub corporation_uuid: Uuid,
    pub project_uuid: Uuid,
    /// Inclusive date range; applied to invoice `bill_date` only.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl DocumentFilter {
    pub fn new(corporation_uuid: Uuid, project_uuid: Uuid) -> Self {
        Self {
            corporation_uuid,
            project_uuid,
            date_range: None,
        }
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some((start, end));
        self
    }

    /// Whether `record` falls inside this filter.
    pub fn matches(&self, record: &DocumentRecord) -> bool {
        if record.corporation_uuid != self.corporation_uuid
            || record.project_uuid != self.project_uuid
        {
            return false;
        }
        match (self.date_range, record.document_date) {
            (None, _) => true,
            (Some((start, end)), Some(date)) => start <= date && date <= end,
            (Some(_), None) => false,
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_project(
        &self,
        corporation_uuid: Uuid,
        project_uuid: Uuid,
    ) -> Result<Option<Project>, AppError>;

    async fn list_vendors(&self, corporation_uuid: Uuid) -> Result<Vec<Vendor>, AppError>;

    /// POs or COs of one project. Any date range on the filter is ignored.
    async fn list_orders(
        &self,
        kind: DocumentKind,
        filter: &DocumentFilter,
    ) -> Result<Vec<DocumentRecord>, AppError>;

    /// Invoices of one project whose bill date is inside the filter's range.
    async fn list_vendor_invoices(
        &self,
        filter: &DocumentFilter,
    ) -> Result<Vec<DocumentRecord>, AppError>;

    /// Overwrite the stored breakdown of one document. Returns `false` when
    /// no such document exists.
    async fn store_financial_breakdown(
        &self,
        kind: DocumentKind,
        uuid: Uuid,
        breakdown: &FinancialBreakdown,
    ) -> Result<bool, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
