use crate::output::print_json;
use anyhow::Context;
use guide_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(
    root: &Path,
    sheet_url: Option<String>,
    base_url: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    io::ensure_dir(&paths::guide_dir(root)).context("failed to create .guide/")?;

    let mut config = Config::load(root).context("failed to load existing config")?;
    if sheet_url.is_some() {
        config.sheet_url = sheet_url;
    }
    if base_url.is_some() {
        config.base_url = base_url;
    }
    config.save(root).context("failed to write .guide/config.yaml")?;

    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({
            "config": paths::config_path(root),
            "sheet_url": config.sheet_url,
            "base_url": config.base_url,
            "warnings": warnings,
        }))?;
        return Ok(());
    }

    println!("Wrote {}", paths::config_path(root).display());
    for w in &warnings {
        println!("  warning: {}", w.message);
    }
    Ok(())
}
