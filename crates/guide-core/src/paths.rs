use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const GUIDE_DIR: &str = ".guide";
pub const CONFIG_FILE: &str = ".guide/config.yaml";
pub const STORAGE_FILE: &str = ".guide/storage.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn guide_dir(root: &Path) -> PathBuf {
    root.join(GUIDE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn storage_path(root: &Path) -> PathBuf {
    root.join(STORAGE_FILE)
}
