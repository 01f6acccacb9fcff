use crate::error::AppError;
use guide_core::{
    catalog::Catalog,
    config::Config,
    paths,
    source::Source,
    store::{FileStore, KeyValueStore, MemoryStore},
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

pub type SharedStore = Arc<Mutex<Box<dyn KeyValueStore + Send>>>;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub source: Source,
    pub client: reqwest::Client,
    pub store: SharedStore,
    catalog: Arc<RwLock<Option<Arc<Catalog>>>>,
}

impl AppState {
    /// State backed by `.guide/storage.json` under `root`. An unreadable
    /// storage file degrades to in-memory storage.
    pub fn new(root: PathBuf, config: Config, source: Source) -> Self {
        let path = paths::storage_path(&root);
        let store: Box<dyn KeyValueStore + Send> = match FileStore::open(&path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "storage unavailable; progress will not be saved");
                Box::new(MemoryStore::new())
            }
        };
        Self::with_store(root, config, source, store)
    }

    pub fn with_store(
        root: PathBuf,
        config: Config,
        source: Source,
        store: Box<dyn KeyValueStore + Send>,
    ) -> Self {
        Self {
            root,
            config: Arc::new(config),
            source,
            client: reqwest::Client::new(),
            store: Arc::new(Mutex::new(store)),
            catalog: Arc::new(RwLock::new(None)),
        }
    }

    /// The current catalog, loading it on first use.
    pub async fn catalog(&self) -> Result<Arc<Catalog>, AppError> {
        let cached = self.catalog.read().await.clone();
        match cached {
            Some(catalog) => Ok(catalog),
            None => self.reload().await,
        }
    }

    /// Fetch the sheet again and replace the cached catalog.
    pub async fn reload(&self) -> Result<Arc<Catalog>, AppError> {
        let mut slot = self.catalog.write().await;
        let policy = self.config.fetch.retry_policy();
        let text = self.source.load(&self.client, &policy).await?;
        let catalog = Arc::new(Catalog::from_csv(&text)?);
        tracing::info!(
            issues = catalog.len(),
            skipped = catalog.skipped(),
            "sheet loaded"
        );
        *slot = Some(catalog.clone());
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn catalog_loads_once_and_reload_replaces() {
        let dir = TempDir::new().unwrap();
        let sheet = dir.path().join("sheet.csv");
        std::fs::write(&sheet, "ID,Issue\n1,A\n").unwrap();

        let state = AppState::new(
            dir.path().to_path_buf(),
            Config::default(),
            Source::File(sheet.clone()),
        );
        assert_eq!(state.catalog().await.unwrap().len(), 1);

        std::fs::write(&sheet, "ID,Issue\n1,A\n2,B\n").unwrap();
        assert_eq!(state.catalog().await.unwrap().len(), 1);
        assert_eq!(state.reload().await.unwrap().len(), 2);
        assert_eq!(state.catalog().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_catalog() {
        let dir = TempDir::new().unwrap();
        let sheet = dir.path().join("sheet.csv");
        std::fs::write(&sheet, "ID,Issue\n1,A\n").unwrap();

        let state = AppState::new(
            dir.path().to_path_buf(),
            Config::default(),
            Source::File(sheet.clone()),
        );
        state.catalog().await.unwrap();

        std::fs::write(&sheet, "ID,Issue\n").unwrap();
        assert!(state.reload().await.is_err());
        assert_eq!(state.catalog().await.unwrap().len(), 1);
    }
}
