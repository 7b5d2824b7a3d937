//! Error types for the roster service
//!
//! One enum per layer: [`CacheError`] for the cache collaborator,
//! [`StoreError`] for the backing store and [`AppError`] for what a request
//! handler returns.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::FieldViolation;

// == Cache Error Enum ==
/// Failures of the cache layer. A clean miss is not an error.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache could not be reached or answered with an error
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// The cache refused a write
    #[error("cache rejected write to '{key}': {reason}")]
    Rejected { key: String, reason: String },

    /// A cached value could not be decoded into the expected record type
    #[error("corrupt cache entry '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded for caching
    #[error("failed to encode cache entry '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

// == Store Error Enum ==
/// Failures of the backing store, including the conflicts its conditional
/// writes detect.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// Insert or re-assignment into a class already at capacity
    #[error("class {class_id} is full (capacity {capacity})")]
    ClassFull { class_id: u64, capacity: u32 },

    /// Capacity update below the live enrollment count
    #[error("capacity {requested} is below current enrollment {enrolled}")]
    CapacityBelowEnrollment { requested: u32, enrolled: usize },

    #[error("persistence error: {0}")]
    Backend(String),
}

// == App Error Enum ==
/// Error returned by managers and handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad input or a violated capacity rule
    #[error("{0}")]
    Validation(String),

    /// Request body failed shape validation on one or more fields
    #[error("invalid request: {}", join_violations(.0))]
    InvalidFields(Vec<FieldViolation>),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Store(StoreError),
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity: "class", .. } => {
                AppError::NotFound("Class not found".to_string())
            }
            StoreError::NotFound { entity: "student", .. } => {
                AppError::NotFound("Student not found".to_string())
            }
            StoreError::NotFound { entity, id } => {
                AppError::NotFound(format!("{entity} {id} not found"))
            }
            StoreError::ClassFull { .. } => {
                AppError::Validation("Cannot add student: class is full".to_string())
            }
            StoreError::CapacityBelowEnrollment { enrolled, .. } => {
                AppError::Validation(capacity_floor_message(enrolled))
            }
            other @ StoreError::Backend(_) => AppError::Store(other),
        }
    }
}

/// Client message for a capacity update below live enrollment.
pub fn capacity_floor_message(enrolled: usize) -> String {
    format!(
        "Cannot reduce capacity below current number of students ({})",
        enrolled
    )
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(_) | AppError::InvalidFields(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Cache(err) => {
                tracing::error!(error = %err, "cache failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error retrieving from cache".to_string(),
                )
            }
            AppError::Store(err) => {
                tracing::error!(error = %err, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for managers and handlers.
pub type Result<T> = std::result::Result<T, AppError>;
