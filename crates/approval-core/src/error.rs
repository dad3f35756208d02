//! Error types for the approval system

use thiserror::Error;

/// Main error type for all approval operations
#[derive(Error, Debug)]
pub enum ApprovalError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("a route already exists for document {document_id}")]
    RouteAlreadyExists { document_id: i64 },

    #[error("no route exists for document {document_id}")]
    RouteNotFound { document_id: i64 },

    #[error(transparent)]
    UnknownTemplate(#[from] approval_types::UnknownTemplate),

    #[error(transparent)]
    UnknownRole(#[from] approval_types::UnknownRole),

    /// Internal-consistency fault: the route points at a step order that
    /// was never materialized. Surfaced, never swallowed.
    #[error("route {route_id} has no step at order {order}")]
    StepNotFound { route_id: String, order: u32 },
}

/// Result type for approval operations
pub type Result<T> = std::result::Result<T, ApprovalError>;
