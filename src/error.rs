//! Error types for Planr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Planr
#[derive(Debug, Error)]
pub enum PlanrError {
    /// No assignment row with this id
    #[error("Assignment not found: {0}")]
    AssignmentNotFound(i64),

    /// Assignment fields that cannot be stored or scheduled
    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Calendar export error
    #[error("Calendar error: {0}")]
    Calendar(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type alias for Planr operations
pub type Result<T> = std::result::Result<T, PlanrError>;
