//! Application context shared by all commands

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::cli::Cli;
use crate::config::{Config, resolve_root};
use crate::error::{DsError, Result};
use crate::search::{BoostConfig, Embedder, HybridSearch, build_embedder};
use crate::storage::{SqliteVectorStore, VectorStore};

/// Everything a command needs: resolved config, the embedding provider,
/// the opened store and the engine wired over both.
///
/// The provider is built exactly once here and shared by `Arc`.
pub struct AppContext {
    pub root: PathBuf,
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub robot_mode: bool,
    pub verbosity: u8,
    pub store: Arc<SqliteVectorStore>,
    pub engine: HybridSearch,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = resolve_root()?;
        std::fs::create_dir_all(&root)?;

        let config = Config::load(cli.config.as_deref(), &root)?;
        Self::from_config(root, config, cli.config.clone(), cli.robot, cli.verbose)
    }

    /// Wire a context from an already-loaded config.
    pub fn from_config(
        root: PathBuf,
        config: Config,
        config_path: Option<PathBuf>,
        robot_mode: bool,
        verbosity: u8,
    ) -> Result<Self> {
        let boosts = BoostConfig::try_from(&config.search)?;
        let embedder: Arc<dyn Embedder> = Arc::from(build_embedder(&config.embedding)?);

        let store_path = config.store_path(&root);
        let store = Arc::new(SqliteVectorStore::open(&store_path, Some(embedder.dims()))?);
        tracing::debug!(
            store = %store_path.display(),
            backend = embedder.name(),
            dims = embedder.dims(),
            "opened embedding store"
        );

        let engine = HybridSearch::with_boosts(
            embedder,
            Arc::clone(&store) as Arc<dyn VectorStore>,
            boosts,
        );

        Ok(Self {
            root,
            config,
            config_path,
            robot_mode,
            verbosity,
            store,
            engine,
        })
    }

    /// Load the catalog from `explicit`, falling back to `[catalog].path`.
    pub fn load_catalog(&self, explicit: Option<&Path>) -> Result<Catalog> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| self.config.catalog.path.clone())
            .ok_or_else(|| {
                DsError::MissingConfig("catalog path (--catalog or [catalog].path)".to_string())
            })?;

        let catalog = Catalog::load(&path)?;
        tracing::debug!(path = %path.display(), items = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn store_path(&self) -> PathBuf {
        self.config.store_path(&self.root)
    }
}
