//! Error types for the Aptsign API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use signature_store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown apartment: {0}")]
    UnknownApartment(u32),

    #[error("admin authorization required")]
    Unauthorized,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no base document uploaded")]
    NoDocument,

    #[error("an export is already in flight")]
    ExportInFlight,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("assembly error: {0}")]
    Assembly(#[from] assembly_core::AssemblyError),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(msg) => ApiError::Validation(msg),
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::UnknownApartment(id) => {
                (StatusCode::NOT_FOUND, format!("Unknown apartment: {}", id))
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Admin authorization required".to_string(),
            ),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ApiError::NoDocument => (
                StatusCode::NOT_FOUND,
                "No base document uploaded".to_string(),
            ),
            ApiError::ExportInFlight => (
                StatusCode::CONFLICT,
                "An export is already in flight".to_string(),
            ),
            ApiError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ApiError::Assembly(e) => {
                tracing::error!("Assembly error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to assemble the signed document".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
