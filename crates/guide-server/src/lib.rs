pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Sheet
        .route("/api/items", get(routes::items::list_items))
        .route("/api/categories", get(routes::items::list_categories))
        .route("/api/item", get(routes::items::get_item))
        .route("/api/reload", post(routes::items::reload))
        // Checklist
        .route("/api/checklist/{id}", get(routes::checklist::get_checklist))
        .route("/api/checklist/{id}", delete(routes::checklist::clear_checklist))
        .route(
            "/api/checklist/{id}/steps/{step}/check",
            post(routes::checklist::check_step),
        )
        .route(
            "/api/checklist/{id}/steps/{step}/uncheck",
            post(routes::checklist::uncheck_step),
        )
        // Recently viewed
        .route("/api/recent", get(routes::recent::get_recent))
        .route("/api/recent", delete(routes::recent::clear_recent))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the API server on `port` (0 = OS-assigned).
pub async fn serve(app_state: state::AppState, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener, open_browser).await
}

/// Start the API server on a pre-bound listener.
///
/// The caller can read the actual port before starting, which matters when
/// the OS picks a free port.
pub async fn serve_on(
    app_state: state::AppState,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    tracing::info!(source = %app_state.source, "guide API listening on http://localhost:{actual_port}");

    let app = build_router(app_state);

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/items");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
