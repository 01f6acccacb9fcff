use super::{load_config, open_store};
use crate::output::{print_json, print_table, truncate};
use guide_core::recent::RecentlyViewed;
use std::path::Path;

pub fn run(root: &Path, clear: bool, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let mut store = open_store(root);
    let mut recent = RecentlyViewed::load(&*store, &config.recent_namespace);

    if clear {
        recent.clear(&mut *store);
        if json {
            print_json(&serde_json::json!({ "cleared": true }))?;
        } else {
            println!("Cleared recently viewed issues.");
        }
        return Ok(());
    }

    if json {
        print_json(&recent.entries())?;
        return Ok(());
    }

    if recent.entries().is_empty() {
        println!("Nothing viewed yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = recent
        .entries()
        .iter()
        .map(|e| {
            vec![
                e.id.clone(),
                truncate(&e.issue, 48),
                e.viewed_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "ISSUE", "VIEWED"], rows);
    Ok(())
}
