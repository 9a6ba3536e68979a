use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use invest_tracker_core::errors::CoreError;
use serde_json::json;

/// Everything a handler can fail with, mapped onto a status and JSON body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Core(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::InvalidCredentials | ApiError::Unauthorized => {
                json!({ "error": self.to_string() })
            }
            ApiError::BadRequest(_) => json!({ "message": self.to_string() }),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                json!({ "message": "Internal server error" })
            }
            ApiError::Core(e) => {
                if status.is_server_error() {
                    tracing::error!(error = %e, "Request failed");
                } else {
                    tracing::warn!(error = %e, "Rejected request");
                }
                json!({ "message": e.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
