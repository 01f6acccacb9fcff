use super::{load_catalog, load_config, SourceOverrides};
use crate::output::{print_json, print_table, truncate};
use guide_core::catalog::Filter;
use std::path::Path;

pub fn run(
    root: &Path,
    overrides: &SourceOverrides,
    query: Option<&str>,
    category: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let catalog = load_catalog(&config, overrides)?;
    let filter = Filter::new(query, category);
    let issues = catalog.filter(&filter);

    if json {
        let items: Vec<serde_json::Value> = issues
            .iter()
            .map(|i| {
                serde_json::json!({
                    "id": i.id,
                    "category": i.category,
                    "issue": i.issue,
                    "description": i.description,
                    "step_count": i.steps().len(),
                    "created_by": i.created_by,
                    "timestamp": i.timestamp,
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "items": items,
            "shown": issues.len(),
            "total": catalog.len(),
        }))?;
        return Ok(());
    }

    if issues.is_empty() {
        if filter.is_empty() {
            println!("No issues in the sheet.");
        } else {
            println!("No issues match.");
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = issues
        .iter()
        .map(|i| {
            vec![
                i.id.clone(),
                i.category.clone(),
                truncate(i.label(), 48),
                i.steps().len().to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "CATEGORY", "ISSUE", "STEPS"], rows);
    if !filter.is_empty() {
        println!();
        println!("{} of {} issues", issues.len(), catalog.len());
    }
    Ok(())
}

pub fn categories(root: &Path, overrides: &SourceOverrides, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let catalog = load_catalog(&config, overrides)?;
    let categories = catalog.categories();

    if json {
        print_json(&categories)?;
        return Ok(());
    }

    if categories.is_empty() {
        println!("No categories.");
        return Ok(());
    }
    for c in &categories {
        println!("{c}");
    }
    Ok(())
}
