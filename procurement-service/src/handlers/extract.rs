//! Request extractors that report failures as [`AppError`] JSON.

use crate::handlers::record_error;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::Validate;

/// JSON body that has been deserialized and validated.
///
/// Unparsable bodies are a 400 and failed validation a 422, both in the
/// service's `{error, details?}` shape.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| {
                record_error(AppError::BadRequest(anyhow::anyhow!(
                    "Invalid JSON body: {}",
                    e.body_text()
                )))
            })?;

        value.validate().map_err(|e| record_error(e.into()))?;

        Ok(ValidatedJson(value))
    }
}
