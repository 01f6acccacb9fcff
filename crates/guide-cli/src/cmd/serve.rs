use super::{load_config, resolve_source, SourceOverrides};
use std::path::Path;

pub fn run(root: &Path, overrides: &SourceOverrides, port: u16, open: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let source = resolve_source(&config, overrides)?;
    let state = guide_server::state::AppState::new(root.to_path_buf(), config, source);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(guide_server::serve(state, port, open))
}
