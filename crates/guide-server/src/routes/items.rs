use axum::extract::{Query, State};
use axum::Json;
use guide_core::{
    catalog::{Filter, Issue},
    links::{detail_link, qr_image_url},
    recent::RecentlyViewed,
};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct ItemParams {
    pub id: Option<String>,
}

fn item_summary(issue: &Issue) -> serde_json::Value {
    serde_json::json!({
        "id": issue.id,
        "category": issue.category,
        "issue": issue.issue,
        "description": issue.description,
        "step_count": issue.steps().len(),
        "created_by": issue.created_by,
        "timestamp": issue.timestamp,
    })
}

/// GET /api/items?q=<text>&category=<name>: filtered issue list.
pub async fn list_items(
    State(app): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let catalog = app.catalog().await?;
    let filter = Filter::new(params.q.as_deref(), params.category.as_deref());
    let items: Vec<serde_json::Value> = catalog.filter(&filter).iter().map(item_summary).collect();
    let shown = items.len();

    Ok(Json(serde_json::json!({
        "items": items,
        "shown": shown,
        "total": catalog.len(),
        "loaded_at": catalog.loaded_at(),
    })))
}

/// GET /api/categories: distinct categories in the sheet.
pub async fn list_categories(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let catalog = app.catalog().await?;
    Ok(Json(serde_json::json!(catalog.categories())))
}

/// GET /api/item?id=<id>: one issue with parsed steps. Records the view.
pub async fn get_item(
    State(app): State<AppState>,
    Query(params): Query<ItemParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let catalog = app.catalog().await?;
    let issue = catalog.lookup(params.id.as_deref())?;

    {
        let mut store = app.store.lock().await;
        let mut recent = RecentlyViewed::load(&**store, &app.config.recent_namespace);
        recent.record(&mut **store, &issue.id, issue.label(), chrono::Utc::now());
    }

    let link = app
        .config
        .base_url
        .as_deref()
        .map(|base| detail_link(base, &issue.id))
        .transpose()?;

    Ok(Json(serde_json::json!({
        "issue": issue,
        "steps": issue.steps(),
        "link": link,
        "qr_image_url": link.as_deref().map(qr_image_url),
    })))
}

/// POST /api/reload: fetch the sheet again.
pub async fn reload(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let catalog = app.reload().await?;
    Ok(Json(serde_json::json!({
        "total": catalog.len(),
        "skipped": catalog.skipped(),
        "loaded_at": catalog.loaded_at(),
    })))
}
