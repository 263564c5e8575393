use spawnwatch_core::{AppConfig, AppConfigExt, SpawnAccessor, SpawnStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the loaded spawn table.
pub type SpawnHandle = Arc<SpawnAccessor<SpawnStore>>;

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the core crate.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<AppConfig>>,
    /// The loaded spawn table. None until a data file is opened or imported.
    spawns: Arc<RwLock<Option<SpawnHandle>>>,
}

impl CliContext {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::load())),
            spawns: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn data_file(&self) -> PathBuf {
        PathBuf::from(&self.config.read().await.data_file)
    }

    /// Open the spawn file and make it the active table.
    pub async fn open(&self, path: &Path) -> Result<SpawnHandle, String> {
        let store = SpawnStore::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        Ok(self.replace(store).await)
    }

    /// Swap in a new store, returning its handle.
    pub async fn replace(&self, store: SpawnStore) -> SpawnHandle {
        let handle = Arc::new(SpawnAccessor::new(store));
        *self.spawns.write().await = Some(Arc::clone(&handle));
        handle
    }

    /// The active spawn table, or an error when none is loaded.
    pub async fn spawns(&self) -> Result<SpawnHandle, String> {
        self.spawns
            .read()
            .await
            .clone()
            .ok_or_else(|| "no spawn data loaded (use `import` or `load`)".to_string())
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}
