//! DVD catalog input
//!
//! The catalog is the system of record for titles, genres and descriptions.
//! It is loaded from a JSON file of the form `{"items": [...]}` and feeds the
//! engine in two directions: enriched text for indexing, and a
//! [`CandidateFilter`] for search.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DsError, Result};
use crate::search::{CandidateFilter, ItemText};
use crate::storage::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub item_id: ItemId,
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub description: String,
}

impl CatalogItem {
    /// Whether the item has a description worth indexing.
    pub fn is_indexable(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Text handed to the embedder for this item.
    pub fn enriched_text(&self) -> String {
        enriched_text(&self.title, &self.genre, &self.description)
    }
}

/// Build the enriched indexing text: `"{title}. Genre is {genre}. {description}"`.
pub fn enriched_text(title: &str, genre: &str, description: &str) -> String {
    format!("{title}. Genre is {genre}. {description}")
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    items: Vec<CatalogItem>,
}

/// In-memory catalog keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: BTreeMap<ItemId, CatalogItem>,
}

impl Catalog {
    /// Load a catalog JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| DsError::Catalog(format!("read {}: {err}", path.display())))?;
        Self::from_json(&raw)
            .map_err(|err| DsError::Catalog(format!("{}: {err}", path.display())))
    }

    /// Parse catalog JSON. Duplicate ids are rejected.
    pub fn from_json(raw: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(raw)
            .map_err(|err| DsError::Catalog(format!("invalid catalog JSON: {err}")))?;
        Self::from_items(file.items)
    }

    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for item in items {
            let item_id = item.item_id;
            if map.insert(item_id, item).is_some() {
                return Err(DsError::Catalog(format!("duplicate item_id {item_id}")));
            }
        }
        Ok(Self { items: map })
    }

    pub fn get(&self, item_id: ItemId) -> Option<&CatalogItem> {
        self.items.get(&item_id)
    }

    /// Look up an item, failing with [`DsError::NotFound`].
    pub fn require(&self, item_id: ItemId) -> Result<&CatalogItem> {
        self.get(item_id)
            .ok_or_else(|| DsError::NotFound(format!("catalog item {item_id}")))
    }

    /// Items in ascending id order.
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Filter admitting every item, or only those in `genre`.
    pub fn filter(&self, genre: Option<&str>) -> GenreFilter<'_> {
        GenreFilter {
            catalog: self,
            genre: genre.map(str::trim).filter(|g| !g.is_empty()).map(str::to_string),
        }
    }
}

/// Restricts search candidates to catalog items, optionally of one genre.
///
/// Genre comparison ignores ASCII case. Stored vectors whose id is not in
/// the catalog are never admitted.
#[derive(Debug, Clone)]
pub struct GenreFilter<'a> {
    catalog: &'a Catalog,
    genre: Option<String>,
}

impl<'a> GenreFilter<'a> {
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// Keyword search: admitted items whose title contains `query`,
    /// ignoring ASCII case, in ascending id order. No embedding is involved.
    pub fn title_matches(&self, query: &str, limit: usize) -> Result<Vec<&'a CatalogItem>> {
        if query.trim().is_empty() {
            return Err(DsError::EmptyQuery);
        }
        if limit == 0 {
            return Err(DsError::InvalidLimit(limit));
        }

        let needle = query.to_ascii_lowercase();
        let catalog: &'a Catalog = self.catalog;
        Ok(catalog
            .items()
            .filter(|item| self.admit(item.item_id).is_some())
            .filter(|item| item.title.to_ascii_lowercase().contains(&needle))
            .take(limit)
            .collect())
    }
}

impl CandidateFilter for GenreFilter<'_> {
    fn admit(&self, item_id: ItemId) -> Option<ItemText<'_>> {
        let item = self.catalog.get(item_id)?;
        if let Some(genre) = &self.genre {
            if !item.genre.eq_ignore_ascii_case(genre) {
                return None;
            }
        }
        Some(ItemText {
            title: &item.title,
            description: &item.description,
        })
    }
}
