use crate::model::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use flightcheck_core::SourceError;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// The request body is not a well-formed batch request.
    #[error("{0}")]
    Validation(String),
    #[error("schedule provider credentials are not configured")]
    MissingCredentials,
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MissingCredentials => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Source(SourceError::MissingCredentials) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Source(SourceError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Source(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "batch request failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
