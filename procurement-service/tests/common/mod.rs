//! Test helper module for procurement-service integration tests.
//!
//! Spawns the service on a random port backed by an in-memory store.

#![allow(dead_code)]

use procurement_service::config::ProcurementConfig;
use procurement_service::models::{DocumentKind, DocumentRecord, Project, Vendor};
use procurement_service::services::{init_metrics, InMemoryDocumentStore};
use procurement_service::startup::Application;
use rust_decimal::Decimal;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use uuid::Uuid;

/// Test application wrapper for integration tests.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryDocumentStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn a new test application on a random port.
    pub async fn spawn() -> Self {
        init_metrics();

        let common = CoreConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
        };
        let config = ProcurementConfig::in_memory(common);
        let store = Arc::new(InMemoryDocumentStore::new());

        let app = Application::build_with_store(config, store.clone())
            .await
            .expect("Failed to build application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped()
                .await
                .expect("Server failed to run");
        });

        Self {
            address: format!("http://127.0.0.1:{}", port),
            port,
            store,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn ap_summary(&self, query: &[(&str, String)]) -> reqwest::Response {
        self.client
            .get(self.url("/api/reports/ap-summary"))
            .query(query)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// A corporation with one project, seeded into a [`TestApp`] store.
pub struct Seed {
    pub corporation_uuid: Uuid,
    pub project_uuid: Uuid,
}

impl Seed {
    pub async fn project(app: &TestApp, name: &str, project_id: &str) -> Self {
        let seed = Self {
            corporation_uuid: Uuid::new_v4(),
            project_uuid: Uuid::new_v4(),
        };
        app.store
            .insert_project(Project {
                uuid: seed.project_uuid,
                corporation_uuid: seed.corporation_uuid,
                project_name: name.to_string(),
                project_id: project_id.to_string(),
            })
            .await;
        seed
    }

    pub async fn vendor(&self, app: &TestApp, name: &str) -> Uuid {
        let uuid = Uuid::new_v4();
        app.store
            .insert_vendor(Vendor {
                uuid,
                corporation_uuid: self.corporation_uuid,
                vendor_name: name.to_string(),
            })
            .await;
        uuid
    }

    pub fn document(
        &self,
        vendor_uuid: Uuid,
        status: &str,
        breakdown: Option<Value>,
    ) -> DocumentRecord {
        DocumentRecord {
            uuid: Uuid::new_v4(),
            corporation_uuid: self.corporation_uuid,
            project_uuid: self.project_uuid,
            vendor_uuid: Some(vendor_uuid),
            status: status.to_string(),
            document_date: None,
            invoice_type: None,
            amount: None,
            holdback: None,
            financial_breakdown: breakdown,
        }
    }

    pub async fn insert(&self, app: &TestApp, kind: DocumentKind, record: DocumentRecord) -> Uuid {
        let uuid = record.uuid;
        app.store.insert_document(kind, record).await;
        uuid
    }

    /// Query for January 2024.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("corporation_uuid", self.corporation_uuid.to_string()),
            ("project_uuid", self.project_uuid.to_string()),
            ("start_date", "2024-01-01".to_string()),
            ("end_date", "2024-01-31".to_string()),
        ]
    }
}

/// Parse a JSON number field as a decimal.
pub fn decimal(value: &Value) -> Decimal {
    value
        .as_f64()
        .and_then(|f| Decimal::try_from(f).ok())
        .map(|d| d.round_dp(2))
        .unwrap_or_else(|| panic!("expected a number, got {}", value))
}
