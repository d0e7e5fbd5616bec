//! Process-local document store used for development and tests.

use crate::models::{DocumentKind, DocumentRecord, FinancialBreakdown, Project, Vendor};
use crate::services::store::{DocumentFilter, DocumentStore};
use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    projects: HashMap<Uuid, Project>,
    vendors: Vec<Vendor>,
    documents: HashMap<DocumentKind, Vec<DocumentRecord>>,
}

/// Document store backed by in-process maps.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    tables: RwLock<Tables>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_project(&self, project: Project) {
        self.tables
            .write()
            .await
            .projects
            .insert(project.uuid, project);
    }

    pub async fn insert_vendor(&self, vendor: Vendor) {
        self.tables.write().await.vendors.push(vendor);
    }

    /// Add a document, replacing any existing one with the same uuid.
    pub async fn insert_document(&self, kind: DocumentKind, record: DocumentRecord) {
        let mut tables = self.tables.write().await;
        let documents = tables.documents.entry(kind).or_default();
        documents.retain(|existing| existing.uuid != record.uuid);
        documents.push(record);
    }

    pub async fn get_document(&self, kind: DocumentKind, uuid: Uuid) -> Option<DocumentRecord> {
        self.tables
            .read()
            .await
            .documents
            .get(&kind)
            .and_then(|documents| documents.iter().find(|doc| doc.uuid == uuid).cloned())
    }

    async fn list(&self, kind: DocumentKind, filter: &DocumentFilter) -> Vec<DocumentRecord> {
        self.tables
            .read()
            .await
            .documents
            .get(&kind)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_project(
        &self,
        corporation_uuid: Uuid,
        project_uuid: Uuid,
    ) -> Result<Option<Project>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .projects
            .get(&project_uuid)
            .filter(|project| project.corporation_uuid == corporation_uuid)
            .cloned())
    }

    async fn list_vendors(&self, corporation_uuid: Uuid) -> Result<Vec<Vendor>, AppError> {
        Ok(self
            .tables
            .read()
            .await
            .vendors
            .iter()
            .filter(|vendor| vendor.corporation_uuid == corporation_uuid)
            .cloned()
            .collect())
    }

    async fn list_orders(
        &self,
        kind: DocumentKind,
        filter: &DocumentFilter,
    ) -> Result<Vec<DocumentRecord>, AppError> {
        let unbounded = DocumentFilter {
            date_range: None,
            ..*filter
        };
        Ok(self.list(kind, &unbounded).await)
    }

    async fn list_vendor_invoices(
        &self,
        filter: &DocumentFilter,
    ) -> Result<Vec<DocumentRecord>, AppError> {
        Ok(self.list(DocumentKind::VendorInvoice, filter).await)
    }

    #[instrument(skip(self, breakdown), fields(kind = kind.as_str(), uuid = %uuid))]
    async fn store_financial_breakdown(
        &self,
        kind: DocumentKind,
        uuid: Uuid,
        breakdown: &FinancialBreakdown,
    ) -> Result<bool, AppError> {
        let value = serde_json::to_value(breakdown).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to encode breakdown: {}", e))
        })?;

        let mut tables = self.tables.write().await;
        let Some(record) = tables
            .documents
            .get_mut(&kind)
            .and_then(|documents| documents.iter_mut().find(|doc| doc.uuid == uuid))
        else {
            return Ok(false);
        };

        record.financial_breakdown = Some(value);
        debug!("Financial breakdown stored in memory");
        Ok(true)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
