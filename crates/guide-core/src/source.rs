use crate::error::Result;
use crate::fetch::{fetch_text, RetryPolicy};
use std::path::PathBuf;

/// Where the sheet text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    /// A local copy of the CSV export.
    File(PathBuf),
}

impl Source {
    pub async fn load(&self, client: &reqwest::Client, policy: &RetryPolicy) -> Result<String> {
        match self {
            Source::Url(url) => Ok(fetch_text(client, url, policy).await?),
            Source::File(path) => Ok(tokio::fs::read_to_string(path).await?),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}
