//! Sequential step checklist.
//!
//! Steps must be completed in order. The stored array of booleans is always
//! brought back to a contiguous checked prefix before use, so a stale or
//! hand-edited entry can never leave a later step checked behind an open one.

use crate::store::{checklist_key, KeyValueStore};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChecklistError {
    #[error("Complete previous steps first")]
    PreviousIncomplete { step: usize },

    #[error("step {step} out of range (checklist has {total} steps)")]
    StepOutOfRange { step: usize, total: usize },

    #[error("checklist mode is off")]
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Locked,
    Available,
    Completed,
}

impl std::fmt::Display for StepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepState::Locked => "locked",
            StepState::Available => "available",
            StepState::Completed => "completed",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Pure operations
// ---------------------------------------------------------------------------

/// Fit `stored` to `len` entries and force everything after the first
/// unchecked entry to unchecked.
pub fn normalize_checklist(stored: &[bool], len: usize) -> Vec<bool> {
    let mut out = Vec::with_capacity(len);
    let mut open_seen = false;
    for i in 0..len {
        let checked = !open_seen && stored.get(i).copied().unwrap_or(false);
        if !checked {
            open_seen = true;
        }
        out.push(checked);
    }
    out
}

/// Index of the first unchecked step, or `None` when every step is done.
pub fn next_available_step(steps: &[bool]) -> Option<usize> {
    steps.iter().position(|done| !done)
}

pub fn completed_count(steps: &[bool]) -> usize {
    steps.iter().filter(|done| **done).count()
}

pub fn step_states(steps: &[bool]) -> Vec<StepState> {
    let next = next_available_step(steps);
    steps
        .iter()
        .enumerate()
        .map(|(i, done)| match (done, next) {
            (true, _) => StepState::Completed,
            (false, Some(n)) if n == i => StepState::Available,
            (false, _) => StepState::Locked,
        })
        .collect()
}

/// "<completed> of <total> completed."
pub fn progress_text(steps: &[bool]) -> String {
    format!("{} of {} completed.", completed_count(steps), steps.len())
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Checklist {
    steps: Vec<bool>,
}

impl Checklist {
    pub fn new(len: usize) -> Self {
        Self {
            steps: vec![false; len],
        }
    }

    pub fn from_stored(stored: &[bool], len: usize) -> Self {
        Self {
            steps: normalize_checklist(stored, len),
        }
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_checked(&self, step: usize) -> bool {
        self.steps.get(step).copied().unwrap_or(false)
    }

    pub fn completed_count(&self) -> usize {
        completed_count(&self.steps)
    }

    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|done| *done)
    }

    pub fn next_available(&self) -> Option<usize> {
        next_available_step(&self.steps)
    }

    pub fn states(&self) -> Vec<StepState> {
        step_states(&self.steps)
    }

    pub fn progress_text(&self) -> String {
        progress_text(&self.steps)
    }

    /// Check `step`. Rejected, leaving the checklist untouched, unless every
    /// earlier step is already checked.
    pub fn check(&mut self, step: usize) -> Result<(), ChecklistError> {
        self.ensure_in_range(step)?;
        if self.steps[..step].iter().any(|done| !done) {
            return Err(ChecklistError::PreviousIncomplete { step });
        }
        self.steps[step] = true;
        Ok(())
    }

    /// Uncheck `step` and every step after it.
    pub fn uncheck(&mut self, step: usize) -> Result<(), ChecklistError> {
        self.ensure_in_range(step)?;
        for done in &mut self.steps[step..] {
            *done = false;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.steps.iter_mut().for_each(|done| *done = false);
    }

    fn ensure_in_range(&self, step: usize) -> Result<(), ChecklistError> {
        if step >= self.steps.len() {
            return Err(ChecklistError::StepOutOfRange {
                step,
                total: self.steps.len(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ChecklistSession
// ---------------------------------------------------------------------------

/// A checklist bound to one item and a backing store.
///
/// Starts with checklist mode off. Every state change is written back as the
/// full boolean array; storage failures are logged and otherwise ignored.
pub struct ChecklistSession<'s, S: KeyValueStore + ?Sized> {
    store: &'s mut S,
    key: String,
    checklist: Checklist,
    enabled: bool,
}

impl<'s, S: KeyValueStore + ?Sized> ChecklistSession<'s, S> {
    pub fn new(store: &'s mut S, namespace: &str, item_id: &str, step_count: usize) -> Self {
        Self {
            store,
            key: checklist_key(namespace, item_id),
            checklist: Checklist::new(step_count),
            enabled: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// Turn checklist mode on, restoring progress from the store.
    pub fn enable(&mut self) -> &Checklist {
        let stored = self.load_stored();
        self.checklist = Checklist::from_stored(&stored, self.checklist.len());
        self.enabled = true;
        &self.checklist
    }

    /// Turn checklist mode off. Persisted progress is left alone.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn check(&mut self, step: usize) -> Result<&Checklist, ChecklistError> {
        self.ensure_enabled()?;
        self.checklist.check(step)?;
        self.persist();
        Ok(&self.checklist)
    }

    pub fn uncheck(&mut self, step: usize) -> Result<&Checklist, ChecklistError> {
        self.ensure_enabled()?;
        self.checklist.uncheck(step)?;
        self.persist();
        Ok(&self.checklist)
    }

    /// Forget all progress for this item, in memory and in the store.
    pub fn clear(&mut self) {
        self.checklist.reset();
        if let Err(e) = self.store.remove(&self.key) {
            tracing::debug!(key = %self.key, error = %e, "checklist clear failed");
        }
    }

    /// Whether the user may toggle `step` right now.
    pub fn is_interactive(&self, step: usize) -> bool {
        self.enabled
            && self
                .checklist
                .states()
                .get(step)
                .is_some_and(|s| *s != StepState::Locked)
    }

    /// Progress line, hidden while checklist mode is off.
    pub fn progress_text(&self) -> Option<String> {
        self.enabled.then(|| self.checklist.progress_text())
    }

    fn ensure_enabled(&self) -> Result<(), ChecklistError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ChecklistError::Disabled)
        }
    }

    fn load_stored(&self) -> Vec<bool> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::debug!(key = %self.key, error = %e, "checklist read failed");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(values) => values
                .iter()
                .map(|v| v.as_bool().unwrap_or(false))
                .collect(),
            Err(e) => {
                tracing::debug!(key = %self.key, error = %e, "ignoring malformed checklist state");
                Vec::new()
            }
        }
    }

    fn persist(&mut self) {
        let data = match serde_json::to_string(self.checklist.as_slice()) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(key = %self.key, error = %e, "checklist encode failed");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, data) {
            tracing::debug!(key = %self.key, error = %e, "checklist write failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
