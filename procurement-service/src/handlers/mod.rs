//! HTTP handlers for procurement-service.

pub mod breakdown;
pub mod extract;
pub mod health;
pub mod reports;

use crate::services::metrics::{ERRORS_TOTAL, HTTP_REQUESTS_TOTAL};
use axum::{
    extract::{MatchedPath, Request},
    http::Method,
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

/// Count the error by kind before it is turned into a response.
pub(crate) fn record_error(error: AppError) -> AppError {
    ERRORS_TOTAL.with_label_values(&[error.kind()]).inc();
    error
}

/// Fallback for routes hit with an unsupported HTTP method.
pub async fn method_not_allowed(method: Method) -> AppError {
    record_error(AppError::MethodNotAllowed(format!(
        "{} is not supported on this route",
        method
    )))
}

/// Count every request by matched route and response status.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[route.as_str(), response.status().as_str()])
        .inc();

    response
}
