use axum::extract::State;
use axum::Json;
use guide_core::recent::RecentlyViewed;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/recent: recently viewed issues, newest first.
pub async fn get_recent(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.lock().await;
    let recent = RecentlyViewed::load(&**store, &app.config.recent_namespace);
    Ok(Json(serde_json::json!(recent.entries())))
}

/// DELETE /api/recent: forget the history.
pub async fn clear_recent(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut store = app.store.lock().await;
    let mut recent = RecentlyViewed::load(&**store, &app.config.recent_namespace);
    recent.clear(&mut **store);
    Ok(Json(serde_json::json!({ "cleared": true })))
}
