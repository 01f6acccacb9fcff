use super::{load_catalog, load_config, open_store, SourceOverrides};
use crate::output::print_json;
use anyhow::{bail, Context};
use guide_core::{
    checklist::{Checklist, ChecklistSession, StepState},
    links::{detail_link, qr_image_url},
    recent::RecentlyViewed,
    GuideError,
};
use std::path::Path;

pub fn run(
    root: &Path,
    overrides: &SourceOverrides,
    id: Option<&str>,
    checklist: bool,
    qr: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let catalog = load_catalog(&config, overrides)?;
    let issue = match catalog.lookup(id) {
        Ok(issue) => issue,
        Err(GuideError::MissingId) => bail!("no issue selected: pass --id <ID>"),
        Err(GuideError::ItemNotFound(id)) => bail!("issue '{id}' is not in the sheet"),
        Err(e) => return Err(e.into()),
    };
    let steps = issue.steps();

    let mut store = open_store(root);
    let mut recent = RecentlyViewed::load(&*store, &config.recent_namespace);
    recent.record(&mut *store, &issue.id, issue.label(), chrono::Utc::now());

    let mut session = ChecklistSession::new(
        &mut *store,
        &config.checklist_namespace,
        &issue.id,
        steps.len(),
    );
    if checklist {
        session.enable();
    }

    let link = match config.base_url.as_deref() {
        Some(base) => Some(detail_link(base, &issue.id)?),
        None if qr => bail!("base_url is not set: run `guide init --base-url <URL>` first"),
        None => None,
    };

    if json {
        let states = session.checklist().states();
        let step_items: Vec<serde_json::Value> = steps
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let mut item = serde_json::json!({ "number": i + 1, "text": text });
                if session.is_enabled() {
                    item["state"] = serde_json::json!(states[i]);
                }
                item
            })
            .collect();
        print_json(&serde_json::json!({
            "issue": issue,
            "steps": step_items,
            "progress": session.progress_text(),
            "link": link,
            "qr_image_url": link.as_deref().map(qr_image_url),
        }))?;
        return Ok(());
    }

    println!("Issue:       {}", issue.label());
    println!("ID:          {}", issue.id);
    if !issue.category.is_empty() {
        println!("Category:    {}", issue.category);
    }
    if !issue.created_by.is_empty() || !issue.timestamp.is_empty() {
        println!(
            "Created:     {} {}",
            issue.created_by,
            if issue.timestamp.is_empty() {
                String::new()
            } else {
                format!("({})", issue.timestamp)
            }
        );
    }
    if !issue.description.is_empty() {
        println!();
        println!("{}", issue.description);
    }

    println!();
    println!("Steps:");
    let list = session.is_enabled().then(|| session.checklist());
    for line in render_steps(&steps, list) {
        println!("  {line}");
    }
    if let Some(progress) = session.progress_text() {
        println!();
        println!("{progress}");
    }

    if let Some(link) = &link {
        println!();
        println!("Link:        {link}");
        if qr {
            let code = render_qr(link).context("could not render QR code")?;
            print_qr_boxed(&code);
        }
    }
    Ok(())
}

/// One display line per step. With a checklist, each line carries its state.
pub(crate) fn render_steps(steps: &[String], list: Option<&Checklist>) -> Vec<String> {
    if steps.is_empty() {
        return vec!["(no steps)".to_string()];
    }
    let states = list.map(|l| l.states());
    steps
        .iter()
        .enumerate()
        .map(|(i, text)| match states.as_ref().and_then(|s| s.get(i)) {
            None => format!("{}. {text}", i + 1),
            Some(StepState::Completed) => format!("[x] {}. {text}", i + 1),
            Some(StepState::Available) => format!("[ ] {}. {text}  <- next", i + 1),
            Some(StepState::Locked) => format!("[ ] {}. {text}  (locked)", i + 1),
        })
        .collect()
}

fn print_qr_boxed(qr: &str) {
    let lines: Vec<&str> = qr.lines().collect();
    let content_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let inner = content_width + 4;
    let border = "─".repeat(inner);

    println!();
    println!("  ┌{border}┐");
    for line in &lines {
        let pad = inner.saturating_sub(line.chars().count() + 2);
        println!("  │  {line}{}│", " ".repeat(pad));
    }
    println!("  └{border}┘");
}

fn render_qr(url: &str) -> Result<String, qrcode::types::QrError> {
    use qrcode::{render::unicode, QrCode};
    let code = QrCode::new(url.as_bytes())?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Dark)
        .light_color(unicode::Dense1x2::Light)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps() -> Vec<String> {
        vec!["Restart".into(), "Check cable".into(), "Done".into()]
    }

    #[test]
    fn plain_steps_are_numbered() {
        assert_eq!(
            render_steps(&steps(), None),
            vec!["1. Restart", "2. Check cable", "3. Done"]
        );
    }

    #[test]
    fn checklist_marks_states() {
        let list = Checklist::from_stored(&[true], 3);
        assert_eq!(
            render_steps(&steps(), Some(&list)),
            vec![
                "[x] 1. Restart",
                "[ ] 2. Check cable  <- next",
                "[ ] 3. Done  (locked)",
            ]
        );
    }

    #[test]
    fn empty_steps_placeholder() {
        assert_eq!(render_steps(&[], None), vec!["(no steps)"]);
    }

    #[test]
    fn qr_renders_unicode_block() {
        let qr = render_qr("https://guide.example.com/d?id=1").unwrap();
        assert!(qr.lines().count() > 5);
    }
}
