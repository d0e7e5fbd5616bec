//! `GET /api/reports/ap-summary`

use crate::handlers::record_error;
use crate::models::ApSummaryReport;
use crate::services::ApSummaryQuery;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use service_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

const REQUIRED_PARAMS: [&str; 4] = ["corporation_uuid", "project_uuid", "start_date", "end_date"];

/// Raw query string. Every parameter is required; blank counts as missing.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ApSummaryParams {
    #[validate(required, length(min = 1))]
    pub corporation_uuid: Option<String>,
    #[validate(required, length(min = 1))]
    pub project_uuid: Option<String>,
    #[validate(required, length(min = 1))]
    pub start_date: Option<String>,
    #[validate(required, length(min = 1))]
    pub end_date: Option<String>,
}

impl ApSummaryParams {
    /// Check presence, then parse into a typed query.
    pub fn into_query(self) -> Result<ApSummaryQuery, AppError> {
        if let Err(errors) = self.validate() {
            let invalid: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            let missing: Vec<&str> = REQUIRED_PARAMS
                .into_iter()
                .filter(|param| invalid.iter().any(|field| field == param))
                .collect();
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Missing required parameter(s): {}",
                missing.join(", ")
            )));
        }

        let corporation_uuid = parse_uuid("corporation_uuid", self.corporation_uuid)?;
        let project_uuid = parse_uuid("project_uuid", self.project_uuid)?;
        let start_date = parse_date("start_date", self.start_date)?;
        let end_date = parse_date("end_date", self.end_date)?;

        if start_date > end_date {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "start_date must not be after end_date"
            )));
        }

        Ok(ApSummaryQuery {
            corporation_uuid,
            project_uuid,
            start_date,
            end_date,
        })
    }
}

fn parse_uuid(name: &str, value: Option<String>) -> Result<Uuid, AppError> {
    let value = value.unwrap_or_default();
    Uuid::parse_str(value.trim())
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid {}: {}", name, value)))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; only the date part is kept.
fn parse_date(name: &str, value: Option<String>) -> Result<NaiveDate, AppError> {
    let value = value.unwrap_or_default();
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid {}: {}", name, value)))
}

#[instrument(skip_all)]
pub async fn ap_summary(
    State(state): State<AppState>,
    Query(params): Query<ApSummaryParams>,
) -> Result<Json<ApSummaryReport>, AppError> {
    let query = params.into_query().map_err(record_error)?;
    let report = state.reports.ap_summary(query).await.map_err(record_error)?;
    Ok(Json(report))
}
