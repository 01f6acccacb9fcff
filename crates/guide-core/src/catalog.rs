use crate::csv::{parse_table, Row};
use crate::error::{GuideError, Result};
use crate::steps::parse_steps;
use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

pub const COL_ID: &str = "ID";
pub const COL_CATEGORY: &str = "Category";
pub const COL_ISSUE: &str = "Issue";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_STEPS: &str = "Steps";
pub const COL_CREATED_BY: &str = "CreatedBy";
pub const COL_TIMESTAMP: &str = "Timestamp";

pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_ID,
    COL_CATEGORY,
    COL_ISSUE,
    COL_DESCRIPTION,
    COL_STEPS,
    COL_CREATED_BY,
    COL_TIMESTAMP,
];

// ---------------------------------------------------------------------------
// Issue
// ---------------------------------------------------------------------------

/// One troubleshooting entry. Missing columns read as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub id: String,
    pub category: String,
    pub issue: String,
    pub description: String,
    /// The Steps cell exactly as the sheet has it.
    pub steps_text: String,
    pub created_by: String,
    pub timestamp: String,
}

impl Issue {
    pub fn from_row(row: &Row) -> Self {
        let col = |name: &str| row.get(name).unwrap_or_default().to_string();
        Self {
            id: col(COL_ID),
            category: col(COL_CATEGORY),
            issue: col(COL_ISSUE),
            description: col(COL_DESCRIPTION),
            steps_text: col(COL_STEPS),
            created_by: col(COL_CREATED_BY),
            timestamp: col(COL_TIMESTAMP),
        }
    }

    pub fn steps(&self) -> Vec<String> {
        parse_steps(&self.steps_text)
    }

    /// Display label: the Issue text, or the id when that is blank.
    pub fn label(&self) -> &str {
        if self.issue.is_empty() {
            &self.id
        } else {
            &self.issue
        }
    }

    fn matches_query(&self, needle: &str) -> bool {
        [
            &self.id,
            &self.category,
            &self.issue,
            &self.description,
            &self.steps_text,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub query: Option<String>,
    pub category: Option<String>,
}

impl Filter {
    pub fn new(query: Option<&str>, category: Option<&str>) -> Self {
        Self {
            query: query.map(str::to_string),
            category: category.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query().is_none() && self.category().is_none()
    }

    fn query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
    }

    /// Matching issues as a new list, in sheet order.
    pub fn apply(&self, issues: &[Issue]) -> Vec<Issue> {
        let query = self.query();
        let category = self.category();
        issues
            .iter()
            .filter(|i| category.map_or(true, |c| i.category.eq_ignore_ascii_case(c)))
            .filter(|i| query.as_deref().map_or(true, |q| i.matches_query(q)))
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// All issues from one fetch of the sheet. Replaced wholesale on reload.
#[derive(Debug, Clone)]
pub struct Catalog {
    headers: Vec<String>,
    issues: Vec<Issue>,
    skipped: usize,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn from_csv(text: &str) -> Result<Self> {
        let table = parse_table(text);
        if table.headers.iter().all(|h| h.is_empty()) {
            return Err(GuideError::NoColumns);
        }
        if table.rows.is_empty() {
            return Err(GuideError::EmptySheet);
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !table.headers.iter().any(|h| h == c))
            .collect();
        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "sheet is missing expected columns");
        }

        let issues = table.rows.iter().map(Issue::from_row).collect();
        Ok(Self {
            headers: table.headers,
            issues,
            skipped: table.skipped,
            loaded_at: Utc::now(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Distinct non-empty categories, sorted case-insensitively.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for issue in &self.issues {
            let c = issue.category.as_str();
            if !c.is_empty() && !out.iter().any(|o| o.eq_ignore_ascii_case(c)) {
                out.push(c.to_string());
            }
        }
        out.sort_by_key(|c| c.to_lowercase());
        out
    }

    pub fn filter(&self, filter: &Filter) -> Vec<Issue> {
        filter.apply(&self.issues)
    }

    pub fn find(&self, id: &str) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id == id)
    }

    /// Resolve the detail view's `id` parameter. A missing or blank id and an
    /// id with no matching row are reported as different errors.
    pub fn lookup(&self, id: Option<&str>) -> Result<&Issue> {
        let id = id.map(str::trim).filter(|s| !s.is_empty()).ok_or(GuideError::MissingId)?;
        self.find(id)
            .ok_or_else(|| GuideError::ItemNotFound(id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
