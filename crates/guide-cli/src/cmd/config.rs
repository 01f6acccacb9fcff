use super::{load_config, resolve_source, SourceOverrides};
use crate::output::print_json;
use clap::Subcommand;
use guide_core::config::WarnLevel;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,
    /// Check the configuration for problems
    Validate,
}

pub fn run(
    root: &Path,
    overrides: &SourceOverrides,
    subcmd: ConfigSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, overrides, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

fn show(root: &Path, overrides: &SourceOverrides, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let source = resolve_source(&config, overrides).ok().map(|s| s.to_string());

    if json {
        print_json(&serde_json::json!({
            "config": config,
            "source": source,
        }))?;
        return Ok(());
    }

    println!("Source:              {}", source.as_deref().unwrap_or("(none)"));
    println!(
        "Base URL:            {}",
        config.base_url.as_deref().unwrap_or("(none)")
    );
    println!("Checklist namespace: {}", config.checklist_namespace);
    println!("Recent namespace:    {}", config.recent_namespace);
    println!(
        "Fetch:               {} attempts, {}ms backoff, {}s timeout",
        config.fetch.max_attempts, config.fetch.initial_backoff_ms, config.fetch.attempt_timeout_secs
    );
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let warnings = config.validate();
    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);

    if json {
        print_json(&serde_json::json!({
            "ok": !has_errors,
            "warnings": warnings,
        }))?;
    } else if warnings.is_empty() {
        println!("Config OK.");
    } else {
        for w in &warnings {
            let tag = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("{tag}: {}", w.message);
        }
    }

    if has_errors {
        anyhow::bail!("configuration has errors");
    }
    Ok(())
}
