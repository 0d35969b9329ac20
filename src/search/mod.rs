//! Search engine for catalog items
//!
//! Implements hybrid search: cosine similarity over stored embeddings plus
//! an exact-match lexical boost.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                 search(query, filter, limit)                   │
//! └────────────────────────────────────────────────────────────────┘
//!                     │                          │
//!                     ▼                          ▼
//! ┌──────────────────────────────┐  ┌──────────────────────────────┐
//! │       Embedder               │  │       VectorStore            │
//! │   (hash / HTTP API)          │  │   (scan_all)                 │
//! └──────────────────────────────┘  └──────────────────────────────┘
//!                     │                          │
//!                     └──────────┬───────────────┘
//!                                ▼
//!                ┌───────────────────────────────┐
//!                │ cosine + lexical boost        │
//!                │ (hybrid.rs)                   │
//!                └───────────────────────────────┘
//!                                │
//!                                ▼
//!                  sorted, truncated candidates
//! ```

pub mod api;
pub mod embeddings;
pub mod hybrid;
pub mod similarity;

pub use api::ApiEmbedder;
pub use embeddings::{Embedder, HashEmbedder, build_embedder};
pub use hybrid::{
    BoostConfig, CandidateFilter, CatalogText, HybridSearch, ItemText, LexicalMatch,
    ScoredCandidate, lexical_bonus,
};
pub use similarity::cosine_similarity;
