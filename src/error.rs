use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::StoreError;
use crate::storage::BlobError;

/// Failure of a sound lifecycle operation. Carries no HTTP knowledge.
#[derive(Debug)]
pub enum SoundError {
    Validation(String),
    Conflict(String),
    NotFound(String),
    Upload(String),
    Persistence(String),
}

impl fmt::Display for SoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundError::Validation(msg) => write!(f, "validation failed: {msg}"),
            SoundError::Conflict(msg) => write!(f, "conflict: {msg}"),
            SoundError::NotFound(msg) => write!(f, "not found: {msg}"),
            SoundError::Upload(msg) => write!(f, "object storage failed: {msg}"),
            SoundError::Persistence(msg) => write!(f, "database failed: {msg}"),
        }
    }
}

impl std::error::Error for SoundError {}

impl From<StoreError> for SoundError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateName(name) => {
                SoundError::Conflict(format!("name already exists: {name}"))
            }
            StoreError::NotFound => SoundError::NotFound("unknown_sound".to_string()),
            StoreError::Backend(msg) => SoundError::Persistence(msg),
        }
    }
}

impl From<BlobError> for SoundError {
    fn from(e: BlobError) -> Self {
        SoundError::Upload(e.to_string())
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug)]
pub enum AppError {
    Internal(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    PayloadTooLarge(String),
    UnsupportedMediaType(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Internal(_) => "internal_error",
            AppError::BadRequest(_) => "invalid_request",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "already_exists",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::UnsupportedMediaType(_) => "unsupported_media_type",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Internal(e) => {
                tracing::error!("internal error: {e}");
                "internal server error".to_string()
            }
            AppError::BadRequest(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::UnsupportedMediaType(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            code: self.code().to_string(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<SoundError> for AppError {
    fn from(e: SoundError) -> Self {
        match e {
            SoundError::Validation(msg) => AppError::BadRequest(msg),
            SoundError::Conflict(msg) => AppError::Conflict(msg),
            SoundError::NotFound(msg) => AppError::NotFound(msg),
            SoundError::Upload(msg) => {
                AppError::Internal(format!("failed to store audio: {msg}"))
            }
            SoundError::Persistence(msg) => {
                AppError::Internal(format!("failed to persist sound: {msg}"))
            }
        }
    }
}
