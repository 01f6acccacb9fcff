use crate::checklist::ChecklistError;
use crate::fetch::FetchError;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuideError {
    #[error("no sheet source configured: pass --url or --file, or set sheet_url in .guide/config.yaml")]
    NoSource,

    #[error("sheet has no columns")]
    NoColumns,

    #[error("sheet has no data rows")]
    EmptySheet,

    #[error("no item id given")]
    MissingId,

    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("invalid url '{0}'")]
    InvalidUrl(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Checklist(#[from] ChecklistError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GuideError>;
