use std::path::{Path, PathBuf};

/// Resolve the directory that holds `.guide/`.
///
/// Priority:
/// 1. `--root` flag / `GUIDE_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.guide/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_guide_dir(&cwd).unwrap_or(cwd)
}

fn find_guide_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(guide_core::paths::GUIDE_DIR).is_dir())
        .map(Path::to_path_buf)
}
