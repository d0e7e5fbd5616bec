//! Financial breakdown endpoints used by the document edit surface.

use crate::engine::{compute_breakdown, BreakdownResult};
use crate::handlers::extract::ValidatedJson;
use crate::handlers::record_error;
use crate::models::{ChargeSettings, DocumentKind, LineItem, TaxConfig};
use crate::services::metrics::BREAKDOWNS_COMPUTED_TOTAL;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Line items plus charge and tax configuration of one document.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DocumentInputs {
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub charges: ChargeSettings,
    #[serde(default)]
    pub sales_taxes: TaxConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BreakdownRequest {
    pub document_kind: DocumentKind,
    #[serde(flatten)]
    #[validate(nested)]
    pub inputs: DocumentInputs,
}

fn evaluate(kind: DocumentKind, inputs: &DocumentInputs) -> Result<BreakdownResult, AppError> {
    let result = compute_breakdown(
        kind,
        &inputs.line_items,
        &inputs.charges,
        &inputs.sales_taxes,
    )
    .map_err(|e| {
        record_error(AppError::BadRequest(anyhow::anyhow!(
            "Line item amounts are too large: {}",
            e
        )))
    })?;
    BREAKDOWNS_COMPUTED_TOTAL
        .with_label_values(&[kind.as_str()])
        .inc();
    Ok(result)
}

/// `POST /api/financial-breakdown`
#[instrument(skip_all)]
pub async fn compute_financial_breakdown(
    ValidatedJson(request): ValidatedJson<BreakdownRequest>,
) -> Result<Json<BreakdownResult>, AppError> {
    Ok(Json(evaluate(request.document_kind, &request.inputs)?))
}

/// `PUT /api/documents/{kind}/{uuid}/financial-breakdown`
#[instrument(skip_all)]
pub async fn store_financial_breakdown(
    State(state): State<AppState>,
    Path((kind, uuid)): Path<(String, String)>,
    ValidatedJson(inputs): ValidatedJson<DocumentInputs>,
) -> Result<Json<BreakdownResult>, AppError> {
    let kind: DocumentKind = kind
        .parse()
        .map_err(|e: String| record_error(AppError::BadRequest(anyhow::anyhow!(e))))?;
    let uuid = Uuid::parse_str(&uuid).map_err(|_| {
        record_error(AppError::BadRequest(anyhow::anyhow!(
            "Invalid document uuid: {}",
            uuid
        )))
    })?;
    let result = evaluate(kind, &inputs)?;

    let stored = state
        .store
        .store_financial_breakdown(kind, uuid, &result.financial_breakdown)
        .await
        .map_err(record_error)?;
    if !stored {
        return Err(record_error(AppError::NotFound(anyhow::anyhow!(
            "Document not found"
        ))));
    }

    info!(
        document_kind = kind.as_str(),
        document_uuid = %uuid,
        grand_total = %result.financial_breakdown.totals.grand_total(kind),
        "Financial breakdown recomputed"
    );

    Ok(Json(result))
}
