use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay_core::api::{FailureBody, ValidationBody, PROMPT_REQUIRED};
use relay_core::completion::UpstreamError;
use thiserror::Error;

/// Every failure of `POST /ask`. Only the status and a fixed message reach the client.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AskError {
    #[error("{}", PROMPT_REQUIRED)]
    Validation,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl AskError {
    pub fn status(&self) -> StatusCode {
        match self {
            AskError::Validation => StatusCode::BAD_REQUEST,
            AskError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AskError {
    fn into_response(self) -> Response {
        match self {
            AskError::Validation => (
                self.status(),
                Json(ValidationBody {
                    error: PROMPT_REQUIRED.to_string(),
                }),
            )
                .into_response(),
            AskError::Upstream(_) => (self.status(), Json(FailureBody::generic())).into_response(),
        }
    }
}
