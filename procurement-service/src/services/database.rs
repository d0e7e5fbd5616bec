//! PostgreSQL document store for procurement-service.

use crate::models::{DocumentKind, DocumentRecord, FinancialBreakdown, Project, Vendor};
use crate::services::metrics::STORE_QUERY_DURATION;
use crate::services::store::{DocumentFilter, DocumentStore};
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "procurement-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

/// Column holding each kind's document date.
fn date_column(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::PurchaseOrder => "po_date",
        DocumentKind::ChangeOrder => "co_date",
        DocumentKind::VendorInvoice => "bill_date",
    }
}

/// Select list mapping any document table onto [`DocumentRecord`].
fn record_columns(kind: DocumentKind) -> String {
    let invoice_columns = match kind {
        DocumentKind::VendorInvoice => "invoice_type, amount, holdback",
        _ => "NULL::TEXT AS invoice_type, NULL::NUMERIC AS amount, NULL::NUMERIC AS holdback",
    };
    format!(
        "uuid, corporation_uuid, project_uuid, vendor_uuid, status, {} AS document_date, {}, \
         financial_breakdown",
        date_column(kind),
        invoice_columns
    )
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(
        skip(self),
        fields(corporation_uuid = %corporation_uuid, project_uuid = %project_uuid)
    )]
    async fn find_project(
        &self,
        corporation_uuid: Uuid,
        project_uuid: Uuid,
    ) -> Result<Option<Project>, AppError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&["find_project"])
            .start_timer();

        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT uuid, corporation_uuid, project_name, project_id
            FROM projects
            WHERE uuid = $1 AND corporation_uuid = $2
            "#,
        )
        .bind(project_uuid)
        .bind(corporation_uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get project: {}", e)))?;

        timer.observe_duration();

        Ok(project)
    }

    #[instrument(skip(self), fields(corporation_uuid = %corporation_uuid))]
    async fn list_vendors(&self, corporation_uuid: Uuid) -> Result<Vec<Vendor>, AppError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&["list_vendors"])
            .start_timer();

        let vendors = sqlx::query_as::<_, Vendor>(
            r#"
            SELECT uuid, corporation_uuid, vendor_name
            FROM vendors
            WHERE corporation_uuid = $1
            ORDER BY vendor_name, uuid
            "#,
        )
        .bind(corporation_uuid)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list vendors: {}", e)))?;

        timer.observe_duration();

        Ok(vendors)
    }

    #[instrument(
        skip(self, filter),
        fields(kind = kind.as_str(), project_uuid = %filter.project_uuid)
    )]
    async fn list_orders(
        &self,
        kind: DocumentKind,
        filter: &DocumentFilter,
    ) -> Result<Vec<DocumentRecord>, AppError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&[kind.table()])
            .start_timer();

        let query = format!(
            "SELECT {} FROM {} WHERE corporation_uuid = $1 AND project_uuid = $2 \
             ORDER BY created_at, uuid",
            record_columns(kind),
            kind.table()
        );
        let records = sqlx::query_as::<_, DocumentRecord>(&query)
            .bind(filter.corporation_uuid)
            .bind(filter.project_uuid)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list {}: {}", kind.table(), e))
            })?;

        timer.observe_duration();

        Ok(records)
    }

    #[instrument(skip(self, filter), fields(project_uuid = %filter.project_uuid))]
    async fn list_vendor_invoices(
        &self,
        filter: &DocumentFilter,
    ) -> Result<Vec<DocumentRecord>, AppError> {
        let Some((start, end)) = filter.date_range else {
            return self.list_orders(DocumentKind::VendorInvoice, filter).await;
        };

        let timer = STORE_QUERY_DURATION
            .with_label_values(&["vendor_invoices"])
            .start_timer();

        let query = format!(
            "SELECT {} FROM vendor_invoices \
             WHERE corporation_uuid = $1 AND project_uuid = $2 \
             AND bill_date >= $3 AND bill_date <= $4 \
             ORDER BY bill_date, uuid",
            record_columns(DocumentKind::VendorInvoice)
        );
        let records = sqlx::query_as::<_, DocumentRecord>(&query)
            .bind(filter.corporation_uuid)
            .bind(filter.project_uuid)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list vendor invoices: {}", e))
            })?;

        timer.observe_duration();

        Ok(records)
    }

    #[instrument(skip(self, breakdown), fields(kind = kind.as_str(), uuid = %uuid))]
    async fn store_financial_breakdown(
        &self,
        kind: DocumentKind,
        uuid: Uuid,
        breakdown: &FinancialBreakdown,
    ) -> Result<bool, AppError> {
        let timer = STORE_QUERY_DURATION
            .with_label_values(&["store_financial_breakdown"])
            .start_timer();

        let query = format!(
            "UPDATE {} SET financial_breakdown = $1, updated_at = NOW() WHERE uuid = $2",
            kind.table()
        );
        let result = sqlx::query(&query)
            .bind(Json(breakdown))
            .bind(uuid)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to store breakdown: {}", e))
            })?;

        timer.observe_duration();

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Financial breakdown stored");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
