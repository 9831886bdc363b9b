//! Translation of facade failures into HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use facade_lib::{SourceError, ValidationError};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Body of validation and write failures
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request body is not a JSON object")]
    BadBody,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Failed read; `missing` is the message used when the entity is absent
    #[error("failed reading {what}: {source}")]
    Read {
        what: &'static str,
        missing: &'static str,
        #[source]
        source: SourceError,
    },

    #[error("failed {action}: {source}")]
    Write {
        action: &'static str,
        #[source]
        source: SourceError,
    },
}

impl ApiError {
    pub fn read(what: &'static str, missing: &'static str) -> impl FnOnce(SourceError) -> Self {
        move |source| ApiError::Read {
            what,
            missing,
            source,
        }
    }

    pub fn write(action: &'static str) -> impl FnOnce(SourceError) -> Self {
        move |source| ApiError::Write { action, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadBody | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Read { source, .. } if source.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Read { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Write { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

fn error_body(status: StatusCode, reason: String) -> Json<ErrorBody> {
    Json(ErrorBody {
        code: status.as_u16(),
        message: status.canonical_reason().unwrap_or_default().to_string(),
        reason,
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::BadBody => {
                (status, error_body(status, "Cannot parse JSON".to_string())).into_response()
            }
            ApiError::Validation(err) => (status, error_body(status, err.to_string())).into_response(),
            ApiError::Read { what, missing, .. } => {
                let message = if status == StatusCode::NOT_FOUND {
                    missing.to_string()
                } else {
                    format!("Failed reading {}", what)
                };
                (status, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Write { action, .. } => {
                (status, error_body(status, format!("Failed {}", action))).into_response()
            }
        }
    }
}
