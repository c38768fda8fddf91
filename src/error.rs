//! Service error type.
//!
//! Handlers return `Result<T, AppError>`; the error renders itself as an
//! [`ErrorResponse`] JSON body with the matching status code. Internal
//! details are logged and replaced by a generic message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::message::ErrorResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A JSON body the extractor could not accept, with the status axum picked.
    #[error("invalid body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidBody { status, .. } => *status,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(m) | AppError::InvalidBody { message: m, .. } => {
                warn!(%status, error = %m, "rejected request");
                m
            }
            AppError::Internal(m) => {
                error!(error = %m, "internal server error");
                "Internal server error".to_string()
            }
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        // Anything axum classifies as a server fault stays generic.
        if status.is_server_error() {
            return AppError::Internal(rejection.body_text());
        }
        let message = match &rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`".to_string()
            }
            JsonRejection::JsonSyntaxError(_) => "Malformed JSON body".to_string(),
            _ => rejection.body_text(),
        };
        AppError::InvalidBody { status, message }
    }
}
