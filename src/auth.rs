use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, state::AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request carried the configured shared API key.
///
/// Mounted as router middleware, so requests with a missing or wrong key are
/// rejected before any handler runs.
pub struct ApiKey;

#[async_trait]
impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        match provided {
            Some(key) if key == state.config.api_key => Ok(ApiKey),
            _ => Err(AppError::unauthorized()),
        }
    }
}
