//! Error handling for dvd-search.
//!
//! This module provides:
//! - [`DsError`]: The main error enum for all index and search operations
//! - [`ErrorKind`]: The coarse taxonomy callers branch on
//! - [`StructuredError`]: Machine-readable error for robot output

mod codes;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorKind;

/// Main error type for dvd-search operations.
#[derive(Error, Debug)]
pub enum DsError {
    #[error("Search query must not be empty")]
    EmptyQuery,

    #[error("Text to index must not be empty")]
    EmptyText,

    #[error("Invalid limit {0}: must be at least 1")]
    InvalidLimit(usize),

    #[error("Embedding failed: {0}")]
    Encoding(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Corrupt embedding record for item {item_id}: {reason}")]
    CorruptRecord { item_id: i64, reason: String },

    #[error("Embedding store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl DsError {
    /// Get the error kind for this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyQuery | Self::EmptyText | Self::InvalidLimit(_) => ErrorKind::InvalidInput,
            Self::Encoding(_) => ErrorKind::EncodingFailure,
            Self::DimensionMismatch { .. }
            | Self::CorruptRecord { .. }
            | Self::StoreUnavailable(_)
            | Self::Database(_)
            | Self::Io(_) => ErrorKind::StorageFailure,
            Self::Json(_) => ErrorKind::Serialization,
            Self::Config(_) | Self::MissingConfig(_) => ErrorKind::Config,
            Self::Catalog(_) => ErrorKind::Catalog,
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::InvalidLimit(limit) => Some(serde_json::json!({ "limit": limit })),
            Self::DimensionMismatch { expected, actual } => {
                Some(serde_json::json!({ "expected": expected, "actual": actual }))
            }
            Self::CorruptRecord { item_id, reason } => {
                Some(serde_json::json!({ "item_id": item_id, "reason": reason }))
            }
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_error(self)
    }
}

/// A structured error with machine-readable kind, suggestion, and context.
///
/// Printed in robot mode so scripts can tell a failed search apart from a
/// search that simply matched nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Always true; lets consumers branch on a single field
    pub error: bool,

    /// The error kind (e.g., "ENCODING_FAILURE")
    pub kind: ErrorKind,

    /// The numeric code (e.g., 200)
    pub code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Whether retrying with other input or settings can succeed
    pub recoverable: bool,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a structured error from a [`DsError`].
    #[must_use]
    pub fn from_error(err: &DsError) -> Self {
        let kind = err.kind();
        Self {
            error: true,
            kind,
            code: kind.numeric(),
            message: err.to_string(),
            suggestion: kind.suggestion().to_string(),
            recoverable: kind.is_recoverable(),
            context: err.context(),
        }
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl From<&DsError> for StructuredError {
    fn from(err: &DsError) -> Self {
        Self::from_error(err)
    }
}

/// Result type alias using [`DsError`].
pub type Result<T> = std::result::Result<T, DsError>;
