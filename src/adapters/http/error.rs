//! API error type and its HTTP mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::usecases::TradeError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Trade(#[from] TradeError),
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("export failed: {0}")]
    Export(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Trade(TradeError::Validation(_)) | Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::Trade(TradeError::Persistence(_)) | Self::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Trade(TradeError::VenueUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Trade(TradeError::Venue(_)) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Converts `ApiError` into a `{error}` JSON response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Trade(TradeError::Persistence(e)) => {
                error!(error = %e, "Ledger write failed");
                "failed to persist ledger".to_string()
            }
            Self::Export(e) => {
                error!(error = %e, "Trade export failed");
                "failed to export trades".to_string()
            }
            Self::Trade(TradeError::Venue(e)) => {
                warn!(error = %e, "Venue read failed");
                e.to_string()
            }
            Self::Body(rejection) => rejection.body_text(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
