pub mod checklist;
pub mod config;
pub mod init;
pub mod list;
pub mod recent;
pub mod serve;
pub mod show;

use anyhow::Context;
use guide_core::{
    catalog::Catalog,
    config::Config,
    paths,
    source::Source,
    store::{FileStore, KeyValueStore, MemoryStore},
    GuideError,
};
use std::path::{Path, PathBuf};

/// `--url` / `--file` given on the command line.
#[derive(Debug, Default, Clone)]
pub struct SourceOverrides {
    pub url: Option<String>,
    pub file: Option<PathBuf>,
}

/// Pick the sheet source: `--file`, then `--url`, then `sheet_url` from config.
pub fn resolve_source(config: &Config, overrides: &SourceOverrides) -> Result<Source, GuideError> {
    if let Some(file) = &overrides.file {
        return Ok(Source::File(file.clone()));
    }
    overrides
        .url
        .as_deref()
        .or(config.sheet_url.as_deref())
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(|u| Source::Url(u.to_string()))
        .ok_or(GuideError::NoSource)
}

pub fn load_config(root: &Path) -> anyhow::Result<Config> {
    Config::load(root).context("failed to load .guide/config.yaml")
}

/// Fetch and parse the sheet. Each call is a fresh load.
pub fn load_catalog(config: &Config, overrides: &SourceOverrides) -> anyhow::Result<Catalog> {
    let source = resolve_source(config, overrides)?;
    let policy = config.fetch.retry_policy();
    let client = reqwest::Client::new();

    let rt = tokio::runtime::Runtime::new()?;
    let text = rt
        .block_on(source.load(&client, &policy))
        .with_context(|| format!("could not load sheet from {source}"))?;

    let catalog = Catalog::from_csv(&text).with_context(|| format!("sheet at {source} is unusable"))?;
    if catalog.skipped() > 0 {
        tracing::warn!(skipped = catalog.skipped(), "some sheet rows were malformed and skipped");
    }
    Ok(catalog)
}

/// Open the on-disk store, falling back to a throwaway in-memory store when
/// the file cannot be read. Progress is then simply not kept.
pub fn open_store(root: &Path) -> Box<dyn KeyValueStore> {
    let path = paths::storage_path(root);
    match FileStore::open(&path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "storage unavailable; progress will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_override_wins() {
        let config = Config {
            sheet_url: Some("https://example.com/a.csv".into()),
            ..Config::default()
        };
        let overrides = SourceOverrides {
            url: Some("https://example.com/b.csv".into()),
            file: Some(PathBuf::from("sheet.csv")),
        };
        assert_eq!(
            resolve_source(&config, &overrides).unwrap(),
            Source::File(PathBuf::from("sheet.csv"))
        );
    }

    #[test]
    fn url_override_beats_config() {
        let config = Config {
            sheet_url: Some("https://example.com/a.csv".into()),
            ..Config::default()
        };
        let overrides = SourceOverrides {
            url: Some("https://example.com/b.csv".into()),
            file: None,
        };
        assert_eq!(
            resolve_source(&config, &overrides).unwrap(),
            Source::Url("https://example.com/b.csv".into())
        );
    }

    #[test]
    fn no_source_is_an_error() {
        let err = resolve_source(&Config::default(), &SourceOverrides::default()).unwrap_err();
        assert!(matches!(err, GuideError::NoSource));
    }
}
