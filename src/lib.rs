//! dvd-search: semantic + lexical search over a DVD catalog.
//!
//! Catalog items are encoded into dense vectors by a pluggable
//! [`search::Embedder`], persisted in a [`storage::VectorStore`], and ranked
//! against free-text queries by [`search::HybridSearch`].

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod search;
pub mod storage;

pub use error::{DsError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
