use regex::Regex;
use std::sync::OnceLock;

static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
static BULLET_RE: OnceLock<Regex> = OnceLock::new();

fn number_re() -> &'static Regex {
    NUMBER_RE.get_or_init(|| Regex::new(r"^\d+[.)]\s*").unwrap())
}

fn bullet_re() -> &'static Regex {
    BULLET_RE.get_or_init(|| Regex::new(r"^[-*•](\s+|$)").unwrap())
}

/// Split a free-text Steps cell into clean instructions.
///
/// Each line loses one leading `N.`/`N)` marker and then one leading bullet
/// (`-`, `*`, `•`). Blank lines, and lines that are nothing but a marker, are
/// dropped. Order is preserved.
pub fn parse_steps(raw: &str) -> Vec<String> {
    raw.lines()
        .flat_map(|line| line.split('\r'))
        .filter_map(clean_line)
        .collect()
}

fn clean_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let line = number_re().replace(line, "");
    let line = bullet_re().replace(&line, "");
    let line = line.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}
