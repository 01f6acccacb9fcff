use axum::extract::{Path, State};
use axum::Json;
use guide_core::checklist::{Checklist, ChecklistSession};

use crate::error::AppError;
use crate::state::AppState;

async fn steps_for(app: &AppState, id: &str) -> Result<Vec<String>, AppError> {
    let catalog = app.catalog().await?;
    let issue = catalog.lookup(Some(id))?;
    Ok(issue.steps())
}

fn summary(id: &str, steps: &[String], list: &Checklist) -> serde_json::Value {
    let items: Vec<serde_json::Value> = steps
        .iter()
        .zip(list.states())
        .enumerate()
        .map(|(index, (text, state))| {
            serde_json::json!({ "index": index, "text": text, "state": state })
        })
        .collect();
    serde_json::json!({
        "id": id,
        "steps": items,
        "completed": list.completed_count(),
        "total": list.len(),
        "next": list.next_available(),
        "progress": list.progress_text(),
    })
}

/// GET /api/checklist/:id: restored, normalized progress for an issue.
pub async fn get_checklist(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let steps = steps_for(&app, &id).await?;
    let mut store = app.store.lock().await;
    let mut session =
        ChecklistSession::new(&mut **store, &app.config.checklist_namespace, &id, steps.len());
    session.enable();
    Ok(Json(summary(&id, &steps, session.checklist())))
}

/// POST /api/checklist/:id/steps/:step/check: complete a step (0-based).
pub async fn check_step(
    State(app): State<AppState>,
    Path((id, step)): Path<(String, usize)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let steps = steps_for(&app, &id).await?;
    let mut store = app.store.lock().await;
    let mut session =
        ChecklistSession::new(&mut **store, &app.config.checklist_namespace, &id, steps.len());
    session.enable();
    let list = session.check(step)?;
    Ok(Json(summary(&id, &steps, list)))
}

/// POST /api/checklist/:id/steps/:step/uncheck: reopen a step and all later ones.
pub async fn uncheck_step(
    State(app): State<AppState>,
    Path((id, step)): Path<(String, usize)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let steps = steps_for(&app, &id).await?;
    let mut store = app.store.lock().await;
    let mut session =
        ChecklistSession::new(&mut **store, &app.config.checklist_namespace, &id, steps.len());
    session.enable();
    let list = session.uncheck(step)?;
    Ok(Json(summary(&id, &steps, list)))
}

/// DELETE /api/checklist/:id: forget progress for an issue.
pub async fn clear_checklist(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let steps = steps_for(&app, &id).await?;
    let mut store = app.store.lock().await;
    let mut session =
        ChecklistSession::new(&mut **store, &app.config.checklist_namespace, &id, steps.len());
    session.clear();
    Ok(Json(summary(&id, &steps, session.checklist())))
}
