use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::ocr::OcrError;
use crate::scoring::ScoringError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Error during evaluation: {0}")]
    EvaluationFailed(String),

    #[error("Failed to process file: {0}")]
    ProcessingFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::EvaluationFailed(_)
            | GatewayError::ProcessingFailed(_)
            | GatewayError::StorageError(_)
            | GatewayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn task_failed(err: tokio::task::JoinError) -> Self {
        GatewayError::InternalError(format!("background task failed: {}", err))
    }
}

impl From<ScoringError> for GatewayError {
    fn from(err: ScoringError) -> Self {
        if err.is_validation() {
            GatewayError::InvalidRequest(err.to_string())
        } else {
            GatewayError::EvaluationFailed(err.to_string())
        }
    }
}

impl From<StorageError> for GatewayError {
    fn from(err: StorageError) -> Self {
        if err.is_not_found() {
            GatewayError::NotFound(err.to_string())
        } else if err.is_validation() {
            GatewayError::InvalidRequest(err.to_string())
        } else {
            GatewayError::StorageError(err.to_string())
        }
    }
}

impl From<OcrError> for GatewayError {
    fn from(err: OcrError) -> Self {
        if err.is_validation() {
            GatewayError::InvalidRequest(err.to_string())
        } else {
            GatewayError::ProcessingFailed(err.to_string())
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
