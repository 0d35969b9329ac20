use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DsError, Result};
use crate::search::BoostConfig;

/// Environment variable naming the data root.
pub const ROOT_ENV: &str = "DVDS_ROOT";
/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DVDS_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub search: SearchConfig,
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
}

impl Config {
    /// Load layered config: defaults, then either the explicit file or the
    /// global and project files, then `DVDS_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                DsError::Config(format!("config file not found: {}", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values the engine cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.embedding.dims == 0 {
            return Err(DsError::Config(
                "embedding.dims must be greater than 0".to_string(),
            ));
        }
        if self.search.default_limit == 0 {
            return Err(DsError::Config(
                "search.default_limit must be at least 1".to_string(),
            ));
        }
        BoostConfig::try_from(&self.search)?;
        Ok(())
    }

    /// Store location, defaulting to `<root>/embeddings.db`.
    pub fn store_path(&self, root: &Path) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| root.join("embeddings.db"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("dvds/config.toml"))
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&root.join("config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| DsError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| DsError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.store {
            self.store.merge(patch);
        }
        if let Some(patch) = patch.catalog {
            self.catalog.merge(patch);
        }
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("DVDS_EMBEDDING_BACKEND") {
            self.embedding.backend = value;
        }
        if let Some(value) = parse_env::<u32>(&lookup, "DVDS_EMBEDDING_DIMS")? {
            self.embedding.dims = value;
        }
        if let Some(value) = lookup("DVDS_EMBEDDING_API_URL") {
            self.embedding.api_url = value;
        }
        if let Some(value) = lookup("DVDS_EMBEDDING_API_MODEL") {
            self.embedding.api_model = value;
        }
        if let Some(value) = lookup("DVDS_EMBEDDING_API_KEY_ENV") {
            self.embedding.api_key_env = Some(value);
        }
        if let Some(value) = parse_env::<u64>(&lookup, "DVDS_EMBEDDING_TIMEOUT_SECS")? {
            self.embedding.timeout_secs = value;
        }

        if let Some(value) = parse_env::<usize>(&lookup, "DVDS_SEARCH_DEFAULT_LIMIT")? {
            self.search.default_limit = value;
        }
        if let Some(value) = parse_env::<f32>(&lookup, "DVDS_SEARCH_TITLE_BOOST")? {
            self.search.title_boost = value;
        }
        if let Some(value) = parse_env::<f32>(&lookup, "DVDS_SEARCH_DESCRIPTION_BOOST")? {
            self.search.description_boost = value;
        }

        if let Some(value) = lookup("DVDS_STORE_PATH") {
            self.store.path = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("DVDS_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }

        Ok(())
    }
}

/// Resolve the data root: `DVDS_ROOT`, else the platform data dir.
pub fn resolve_root() -> Result<PathBuf> {
    if let Ok(root) = std::env::var(ROOT_ENV) {
        return Ok(PathBuf::from(root));
    }
    dirs::data_dir()
        .map(|dir| dir.join("dvds"))
        .ok_or_else(|| DsError::MissingConfig(format!("{ROOT_ENV} (no data directory found)")))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `hash` (built-in) or `api` (OpenAI-compatible endpoint)
    pub backend: String,
    pub dims: u32,
    pub api_url: String,
    pub api_model: String,
    /// Name of the environment variable holding the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: "hash".to_string(),
            dims: 384,
            api_url: "https://api.openai.com/v1".to_string(),
            api_model: "text-embedding-3-small".to_string(),
            api_key_env: Some("OPENAI_API_KEY".to_string()),
            timeout_secs: 30,
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingPatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.dims {
            self.dims = value;
        }
        if let Some(value) = patch.api_url {
            self.api_url = value;
        }
        if let Some(value) = patch.api_model {
            self.api_model = value;
        }
        if let Some(value) = patch.api_key_env {
            self.api_key_env = Some(value);
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: usize,
    pub title_boost: f32,
    pub description_boost: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            title_boost: 2.0,
            description_boost: 1.0,
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.default_limit {
            self.default_limit = value;
        }
        if let Some(value) = patch.title_boost {
            self.title_boost = value;
        }
        if let Some(value) = patch.description_boost {
            self.description_boost = value;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    fn merge(&mut self, patch: StorePatch) {
        if let Some(value) = patch.path {
            self.path = Some(value);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    fn merge(&mut self, patch: CatalogPatch) {
        if let Some(value) = patch.path {
            self.path = Some(value);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub embedding: Option<EmbeddingPatch>,
    pub search: Option<SearchPatch>,
    pub store: Option<StorePatch>,
    pub catalog: Option<CatalogPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EmbeddingPatch {
    pub backend: Option<String>,
    pub dims: Option<u32>,
    pub api_url: Option<String>,
    pub api_model: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub default_limit: Option<usize>,
    pub title_boost: Option<f32>,
    pub description_boost: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StorePatch {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogPatch {
    pub path: Option<PathBuf>,
}

fn parse_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| DsError::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}
