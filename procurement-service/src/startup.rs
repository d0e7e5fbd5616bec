//! Application startup and lifecycle management.

use crate::config::{ProcurementConfig, StoreBackend};
use crate::handlers::breakdown::{compute_financial_breakdown, store_financial_breakdown};
use crate::handlers::health::{health_check, metrics_handler, readiness_check};
use crate::handlers::reports::ap_summary;
use crate::handlers::{method_not_allowed, metrics_middleware};
use crate::services::{
    init_metrics, ApSummaryService, DocumentStore, InMemoryDocumentStore, PgDocumentStore,
};
use axum::{
    body::Body,
    middleware,
    routing::{get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::tracing::{make_request_span, request_id_middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ProcurementConfig,
    pub store: Arc<dyn DocumentStore>,
    pub reports: ApSummaryService,
}

/// HTTP routes of the service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .route(
            "/api/financial-breakdown",
            post(compute_financial_breakdown).fallback(method_not_allowed),
        )
        .route(
            "/api/documents/:kind/:uuid/financial-breakdown",
            put(store_financial_breakdown).fallback(method_not_allowed),
        )
        .route(
            "/api/reports/ap-summary",
            get(ap_summary).fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, connecting to the configured store.
    pub async fn build(config: ProcurementConfig) -> Result<Self, AppError> {
        let store: Arc<dyn DocumentStore> = match config.store {
            StoreBackend::Postgres => {
                let database = config.database.as_ref().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!("DATABASE_URL is required"))
                })?;
                let db = PgDocumentStore::new(
                    &database.url,
                    database.max_connections,
                    database.min_connections,
                )
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                    e
                })?;
                db.run_migrations().await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to run migrations");
                    e
                })?;
                Arc::new(db)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory document store; data is not persisted");
                Arc::new(InMemoryDocumentStore::new())
            }
        };

        Self::build_with_store(config, store).await
    }

    /// Build the application around an existing store. Tests use this with
    /// a seeded [`InMemoryDocumentStore`].
    pub async fn build_with_store(
        config: ProcurementConfig,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, AppError> {
        init_metrics();

        let state = AppState {
            config: config.clone(),
            reports: ApSummaryService::new(store.clone()),
            store,
        };

        let addr = config.common.bind_address();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port = port,
            store = config.store.as_str(),
            "Procurement service listener bound"
        );

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let app = router(self.state);

        tracing::info!(
            service = "procurement-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, app).await
    }
}
