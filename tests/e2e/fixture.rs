//! E2E test fixture with step logging.

use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dvd_search::catalog::{Catalog, CatalogItem};
use dvd_search::search::{HashEmbedder, HybridSearch};
use dvd_search::storage::SqliteVectorStore;
use serde_json::Value;
use tempfile::TempDir;

pub const DIMS: usize = 384;

/// Captured output of a `dvds` invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl CommandOutput {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|err| panic!("stdout is not JSON ({err}): {}", self.stdout))
    }
}

/// Isolated data root with a store, a catalog file and step logging.
pub struct E2EFixture {
    pub scenario_name: String,
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub store_path: PathBuf,
    pub catalog_path: PathBuf,
    start_time: Instant,
    step_count: usize,
}

impl E2EFixture {
    pub fn new(scenario_name: &str) -> Self {
        let start_time = Instant::now();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let store_path = root.join("embeddings.db");
        let catalog_path = root.join("catalog.json");

        println!();
        println!("{}", "█".repeat(70));
        println!("█ E2E SCENARIO: {scenario_name}");
        println!("{}", "█".repeat(70));
        println!("[E2E] Root: {root:?}");

        Self {
            scenario_name: scenario_name.to_string(),
            temp_dir,
            root,
            store_path,
            catalog_path,
            start_time,
            step_count: 0,
        }
    }

    pub fn log_step(&mut self, description: &str) {
        self.step_count += 1;
        println!();
        println!("┌{}", "─".repeat(68));
        println!("│ STEP {}: {}", self.step_count, description);
        println!("│ Time: {:?}", self.start_time.elapsed());
        println!("└{}", "─".repeat(68));
    }

    pub fn open_store(&self, dims: usize) -> Arc<SqliteVectorStore> {
        Arc::new(SqliteVectorStore::open(&self.store_path, Some(dims)).expect("Failed to open store"))
    }

    /// Engine over the on-disk store with the built-in hash provider.
    pub fn engine(&self) -> (HybridSearch, Arc<SqliteVectorStore>) {
        let store = self.open_store(DIMS);
        let engine = HybridSearch::new(Arc::new(HashEmbedder::new(DIMS)), store.clone());
        (engine, store)
    }

    pub fn write_catalog(&self, items: &[CatalogItem]) -> Catalog {
        let json = serde_json::json!({ "items": items });
        std::fs::write(&self.catalog_path, json.to_string()).expect("Failed to write catalog");
        println!("[CATALOG] {} items -> {:?}", items.len(), self.catalog_path);
        Catalog::from_items(items.to_vec()).expect("Invalid catalog")
    }

    /// Run the `dvds` binary against this fixture's root.
    pub fn run_dvds(&mut self, args: &[&str]) -> CommandOutput {
        let start = Instant::now();
        println!();
        println!("[CMD] dvds {}", args.join(" "));

        let output = Command::new(env!("CARGO_BIN_EXE_dvds"))
            .args(args)
            .env("HOME", &self.root)
            .env("XDG_CONFIG_HOME", self.root.join(".config"))
            .env("DVDS_ROOT", &self.root)
            .env("DVDS_CATALOG_PATH", &self.catalog_path)
            .env("DVDS_EMBEDDING_BACKEND", "hash")
            .env("DVDS_EMBEDDING_DIMS", DIMS.to_string())
            .env_remove("DVDS_CONFIG")
            .env_remove("RUST_LOG")
            .current_dir(&self.root)
            .output()
            .expect("Failed to execute dvds");

        let result = CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            elapsed: start.elapsed(),
        };

        println!("[CMD] Exit: {} ({:?})", result.exit_code, result.elapsed);
        if !result.stdout.is_empty() {
            println!("[STDOUT] {}", result.stdout);
        }
        if !result.stderr.is_empty() {
            println!("[STDERR] {}", result.stderr);
        }
        result
    }

    pub fn assert_success(&self, output: &CommandOutput, operation: &str) {
        assert!(
            output.success,
            "[E2E] {} failed with exit code {}: {}",
            operation, output.exit_code, output.stderr
        );
        println!("[ASSERT] {operation} - SUCCESS");
    }
}

impl Drop for E2EFixture {
    fn drop(&mut self) {
        println!();
        println!(
            "[E2E] {} finished after {} steps in {:?}",
            self.scenario_name,
            self.step_count,
            self.start_time.elapsed()
        );
    }
}

pub fn item(item_id: i64, title: &str, genre: &str, description: &str) -> CatalogItem {
    CatalogItem {
        item_id,
        title: title.to_string(),
        genre: genre.to_string(),
        description: description.to_string(),
    }
}

/// Small catalog used across scenarios.
pub fn sample_items() -> Vec<CatalogItem> {
    vec![
        item(1, "Space Odyssey", "Sci-Fi", "A lonely astronaut explores deep space"),
        item(2, "Big Top", "Comedy", "A clown makes children laugh"),
        item(3, "Red Planet", "Sci-Fi", "Colonists struggle to survive on Mars"),
        item(4, "Harbor Lights", "Drama", "A fisherman waits for a ship that never returns"),
        item(5, "Coming Soon", "Drama", ""),
    ]
}
