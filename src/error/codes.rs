//! Error kinds for machine-parseable output.
//!
//! Numeric codes are grouped by hundreds:
//! - 1xx: Invalid input
//! - 2xx: Embedding provider failures
//! - 3xx: Storage failures
//! - 4xx: Lookup failures
//! - 5xx: Configuration and catalog input

use serde::{Deserialize, Serialize};

/// Coarse error taxonomy shared by the library and robot output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Empty query or text, non-positive limit
    InvalidInput,
    /// The embedding provider could not produce a vector
    EncodingFailure,
    /// Read/write error, dimension mismatch, corrupt blob
    StorageFailure,
    /// Referenced catalog item does not exist
    NotFound,
    /// Invalid or missing configuration
    Config,
    /// Catalog file could not be read or parsed
    Catalog,
    /// JSON encoding/decoding failed
    Serialization,
}

impl ErrorKind {
    /// Numeric code for this kind.
    #[must_use]
    pub const fn numeric(self) -> u16 {
        match self {
            Self::InvalidInput => 100,
            Self::EncodingFailure => 200,
            Self::StorageFailure => 300,
            Self::NotFound => 400,
            Self::Config => 500,
            Self::Catalog => 510,
            Self::Serialization => 520,
        }
    }

    /// Whether retrying with different input or environment can succeed.
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        !matches!(self, Self::StorageFailure)
    }

    /// Short recovery hint shown next to the error.
    #[must_use]
    pub const fn suggestion(self) -> &'static str {
        match self {
            Self::InvalidInput => "Pass a non-empty query and a limit of at least 1",
            Self::EncodingFailure => {
                "Check the embedding backend (dvds embed \"test\") and its API settings"
            }
            Self::StorageFailure => {
                "Check the store path; after changing embedding dims run `dvds reindex` on a fresh store"
            }
            Self::NotFound => "Check the item id against the catalog file",
            Self::Config => "Check config.toml and DVDS_* environment variables",
            Self::Catalog => "Catalog must be JSON of the form {\"items\": [...]}",
            Self::Serialization => "Report this as a bug",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::EncodingFailure => "ENCODING_FAILURE",
            Self::StorageFailure => "STORAGE_FAILURE",
            Self::NotFound => "NOT_FOUND",
            Self::Config => "CONFIG",
            Self::Catalog => "CATALOG",
            Self::Serialization => "SERIALIZATION",
        };
        f.write_str(name)
    }
}
