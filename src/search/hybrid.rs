//! Hybrid semantic + lexical ranking
//!
//! Every stored vector admitted by the caller's filter is scored against
//! the query:
//!
//! ```text
//! final_score = cosine(q, v) + lexical_bonus
//! lexical_bonus = title_boost        if query ⊂ title
//!               | description_boost  if query ⊂ description
//!               | 0
//! ```
//!
//! Substring tests are exact and case-sensitive. Results are ordered by
//! `final_score` descending, ties broken by ascending item id, and then
//! truncated to the caller's limit. There is no internal over-fetch cap:
//! every admitted record is scored before truncation.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;

use crate::config::SearchConfig;
use crate::error::{DsError, Result};
use crate::search::embeddings::Embedder;
use crate::search::similarity::cosine_similarity;
use crate::storage::{ItemId, VectorStore};

/// Boost weights applied on exact query matches.
///
/// Both weights are finite and non-negative, and the title weight is never
/// below the description weight. Construct through [`BoostConfig::new`] or
/// `TryFrom<&SearchConfig>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostConfig {
    title_boost: f32,
    description_boost: f32,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            title_boost: 2.0,
            description_boost: 1.0,
        }
    }
}

impl BoostConfig {
    pub fn new(title_boost: f32, description_boost: f32) -> Result<Self> {
        for (name, value) in [
            ("title_boost", title_boost),
            ("description_boost", description_boost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DsError::Config(format!(
                    "search.{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        if title_boost < description_boost {
            return Err(DsError::Config(format!(
                "search.title_boost ({title_boost}) must not be below search.description_boost ({description_boost})"
            )));
        }

        Ok(Self {
            title_boost,
            description_boost,
        })
    }

    /// Added when the query is a substring of the title
    pub fn title_boost(&self) -> f32 {
        self.title_boost
    }

    /// Added when the query is a substring of the description (and not the title)
    pub fn description_boost(&self) -> f32 {
        self.description_boost
    }
}

impl TryFrom<&SearchConfig> for BoostConfig {
    type Error = DsError;

    fn try_from(config: &SearchConfig) -> Result<Self> {
        Self::new(config.title_boost, config.description_boost)
    }
}

/// Which lexical rule fired for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LexicalMatch {
    Title,
    Description,
    None,
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub item_id: ItemId,
    /// Cosine similarity in `[-1, 1]`
    pub similarity: f32,
    pub lexical_bonus: f32,
    pub final_score: f32,
    pub lexical_match: LexicalMatch,
}

/// Display text the lexical boost is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemText<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

/// Caller-supplied candidate predicate.
///
/// Returns the item's display text when the item may appear in results
/// (e.g. it belongs to the requested genre), `None` to exclude it. The
/// engine does not interpret the filter beyond that.
pub trait CandidateFilter {
    fn admit(&self, item_id: ItemId) -> Option<ItemText<'_>>;
}

/// Owned title/description pair, for callers that build filters ad hoc.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogText {
    pub title: String,
    pub description: String,
}

impl CatalogText {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    fn as_item_text(&self) -> ItemText<'_> {
        ItemText {
            title: &self.title,
            description: &self.description,
        }
    }
}

impl CandidateFilter for HashMap<ItemId, CatalogText> {
    fn admit(&self, item_id: ItemId) -> Option<ItemText<'_>> {
        self.get(&item_id).map(CatalogText::as_item_text)
    }
}

impl CandidateFilter for BTreeMap<ItemId, CatalogText> {
    fn admit(&self, item_id: ItemId) -> Option<ItemText<'_>> {
        self.get(&item_id).map(CatalogText::as_item_text)
    }
}

/// Compute the lexical bonus for `query` against an item's text.
pub fn lexical_bonus(query: &str, text: ItemText<'_>, boosts: BoostConfig) -> (f32, LexicalMatch) {
    if text.title.contains(query) {
        (boosts.title_boost, LexicalMatch::Title)
    } else if text.description.contains(query) {
        (boosts.description_boost, LexicalMatch::Description)
    } else {
        (0.0, LexicalMatch::None)
    }
}

/// Order by final score descending, then item id ascending.
fn rank_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.final_score
        .total_cmp(&a.final_score)
        .then_with(|| a.item_id.cmp(&b.item_id))
}

/// Hybrid search engine.
///
/// Holds no state of its own between calls; the provider and store are
/// shared handles created at startup.
#[derive(Clone)]
pub struct HybridSearch {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    boosts: BoostConfig,
}

impl std::fmt::Debug for HybridSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridSearch")
            .field("embedder", &self.embedder.name())
            .field("dims", &self.embedder.dims())
            .field("boosts", &self.boosts)
            .finish_non_exhaustive()
    }
}

impl HybridSearch {
    /// Create an engine with the default boosts (+2.0 title, +1.0 description).
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self::with_boosts(embedder, store, BoostConfig::default())
    }

    pub fn with_boosts(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        boosts: BoostConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            boosts,
        }
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn store(&self) -> &dyn VectorStore {
        self.store.as_ref()
    }

    pub fn boosts(&self) -> BoostConfig {
        self.boosts
    }

    /// Encode `text` and store it as the embedding for `item_id`.
    ///
    /// Encoding runs before the store is touched, so a failure at any step
    /// leaves the existing record (if any) as it was.
    pub fn index(&self, item_id: ItemId, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(DsError::EmptyText);
        }

        let vector = self.embedder.embed(text)?;
        if vector.len() != self.embedder.dims() {
            return Err(DsError::Encoding(format!(
                "{} embedder returned {} dims, declared {}",
                self.embedder.name(),
                vector.len(),
                self.embedder.dims()
            )));
        }

        self.store.put(item_id, &vector)?;
        tracing::debug!(item_id, dims = vector.len(), "indexed item");
        Ok(())
    }

    /// Remove the embedding for `item_id`. Absent ids are not an error.
    pub fn remove(&self, item_id: ItemId) -> Result<bool> {
        let removed = self.store.remove(item_id)?;
        tracing::debug!(item_id, removed, "removed item embedding");
        Ok(removed)
    }

    /// Rank stored items against `query`.
    ///
    /// Returns at most `limit` candidates. Either the whole ranking succeeds
    /// or an error is returned; an empty vector means nothing matched.
    pub fn search<F>(&self, query: &str, filter: &F, limit: usize) -> Result<Vec<ScoredCandidate>>
    where
        F: CandidateFilter + ?Sized,
    {
        if query.trim().is_empty() {
            return Err(DsError::EmptyQuery);
        }
        if limit == 0 {
            return Err(DsError::InvalidLimit(limit));
        }

        let query_vector = self.embedder.embed(query)?;
        let records = self.store.scan_all()?;
        let scanned = records.len();

        let mut candidates = Vec::new();
        for record in records {
            let Some(text) = filter.admit(record.item_id) else {
                continue;
            };

            let similarity = cosine_similarity(&query_vector, &record.vector)?;
            let (lexical_bonus, lexical_match) = lexical_bonus(query, text, self.boosts);

            candidates.push(ScoredCandidate {
                item_id: record.item_id,
                similarity,
                lexical_bonus,
                final_score: similarity + lexical_bonus,
                lexical_match,
            });
        }

        let admitted = candidates.len();
        candidates.sort_by(rank_order);
        candidates.truncate(limit);

        tracing::debug!(
            scanned,
            admitted,
            returned = candidates.len(),
            "hybrid search complete"
        );
        Ok(candidates)
    }
}
