use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use utoipa::ToSchema;

use crate::models::EntityKind;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Service Unavailable",
    "message": "data unavailable for rakes",
    "request_id": "req-abc123xyz",
    "timestamp": "2025-03-01T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Service Unavailable")
    #[schema(example = "Service Unavailable")]
    pub error: String,
    /// Human-readable error description
    #[schema(example = "data unavailable for rakes")]
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "req-abc123xyz")]
    pub request_id: Option<String>,
    /// ISO 8601 timestamp when error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    /// The record store could not be reached or could not answer a query.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store refused a single record (uniqueness, foreign key, type).
    #[error("Insert rejected: {0}")]
    InsertRejected(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Snapshot {file} is malformed: {reason}")]
    SnapshotMalformed { file: String, reason: String },

    /// Neither the store nor the snapshot could serve the kind.
    #[error("data unavailable for {0}")]
    DataUnavailable(EntityKind),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    pub fn store_unavailable(err: impl fmt::Display) -> Self {
        ServiceError::StoreUnavailable(err.to_string())
    }

    pub fn malformed(file: impl Into<String>, reason: impl Into<String>) -> Self {
        ServiceError::SnapshotMalformed {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// True for the snapshot-side failures the resolver folds into `DataUnavailable`.
    pub fn is_snapshot_failure(&self) -> bool {
        matches!(
            self,
            Self::SnapshotNotFound(_) | Self::SnapshotMalformed { .. }
        )
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DataUnavailable(_) | Self::StoreUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::SnapshotNotFound(_) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::SnapshotMalformed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InsertRejected(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ValidationError(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::InternalError(_) => "Internal server error".to_string(),
            Self::StoreUnavailable(_) => "Record store unavailable".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = self.response_message();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        }

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: error_message,
            details: None,
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
