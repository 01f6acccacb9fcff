use axum::http::StatusCode;
use guide_core::{config::Config, source::Source, store::MemoryStore};
use guide_server::state::AppState;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SHEET: &str = "ID,Category,Issue,Description,Steps,CreatedBy,Timestamp\n\
    1,Network,Wifi slow,\"Slow, flaky\",\"1. Restart router\n2) Check cable\n- Done\",ana,2026-01-02\n\
    2,Printer,Paper jam,Tray 2 jams,- Open tray,ben,2026-01-03\n\
    3,Network,VPN drops,,\"* Reconnect\",ana,2026-01-04\n";

/// Write the sheet to a temp file and build state over it with an in-memory store.
fn app_state(dir: &TempDir, sheet: &str, config: Config) -> AppState {
    let path = dir.path().join("sheet.csv");
    std::fs::write(&path, sheet).unwrap();
    AppState::with_store(
        dir.path().to_path_buf(),
        config,
        Source::File(path),
        Box::new(MemoryStore::new()),
    )
}

fn app(dir: &TempDir) -> axum::Router {
    guide_server::build_router(app_state(dir, SHEET, Config::default()))
}

async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri).await
}

async fn post(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri).await
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_items_returns_all_rows() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(app(&dir), "/api/items").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 3);
    assert_eq!(json["shown"], 3);
    assert_eq!(json["items"][0]["id"], "1");
    assert_eq!(json["items"][0]["step_count"], 3);
}

#[tokio::test]
async fn list_items_filters_by_query_and_category() {
    let dir = TempDir::new().unwrap();
    let router = app(&dir);

    let (_, json) = get(router.clone(), "/api/items?q=cable").await;
    assert_eq!(json["shown"], 1);
    assert_eq!(json["items"][0]["id"], "1");

    let (_, json) = get(router.clone(), "/api/items?category=network").await;
    assert_eq!(json["shown"], 2);

    let (_, json) = get(router, "/api/items?q=jam&category=Network").await;
    assert_eq!(json["shown"], 0);
    assert_eq!(json["total"], 3);
}

#[tokio::test]
async fn categories_are_listed() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(app(&dir), "/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!(["Network", "Printer"]));
}

#[tokio::test]
async fn get_item_returns_parsed_steps() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(app(&dir), "/api/item?id=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["issue"]["issue"], "Wifi slow");
    assert_eq!(json["issue"]["description"], "Slow, flaky");
    assert_eq!(
        json["steps"],
        serde_json::json!(["Restart router", "Check cable", "Done"])
    );
    assert!(json["link"].is_null());
}

#[tokio::test]
async fn get_item_without_id_is_400() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(app(&dir), "/api/item").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("no item id"));
}

#[tokio::test]
async fn get_item_unknown_id_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(app(&dir), "/api/item?id=99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn get_item_includes_share_link_when_configured() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        base_url: Some("https://guide.example.com/detail.html".into()),
        ..Config::default()
    };
    let router = guide_server::build_router(app_state(&dir, SHEET, config));
    let (_, json) = get(router, "/api/item?id=2").await;

    assert_eq!(json["link"], "https://guide.example.com/detail.html?id=2");
    assert!(json["qr_image_url"]
        .as_str()
        .unwrap()
        .starts_with("https://api.qrserver.com/"));
}

#[tokio::test]
async fn header_only_sheet_is_bad_gateway() {
    let dir = TempDir::new().unwrap();
    let router = guide_server::build_router(app_state(
        &dir,
        "ID,Category,Issue\n",
        Config::default(),
    ));
    let (status, json) = get(router, "/api/items").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("no data rows"));
}

#[tokio::test]
async fn reload_picks_up_new_rows() {
    let dir = TempDir::new().unwrap();
    let state = app_state(&dir, SHEET, Config::default());
    let router = guide_server::build_router(state);

    let (_, json) = get(router.clone(), "/api/items").await;
    assert_eq!(json["total"], 3);

    let extra = format!("{SHEET}4,Email,Bounce,,- Check address,cy,2026-01-05\n");
    std::fs::write(dir.path().join("sheet.csv"), extra).unwrap();

    let (status, json) = post(router.clone(), "/api/reload").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 4);

    let (_, json) = get(router, "/api/items").await;
    assert_eq!(json["total"], 4);
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fresh_checklist_has_first_step_available() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(app(&dir), "/api/checklist/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["completed"], 0);
    assert_eq!(json["total"], 3);
    assert_eq!(json["next"], 0);
    assert_eq!(json["steps"][0]["state"], "available");
    assert_eq!(json["steps"][1]["state"], "locked");
    assert_eq!(json["progress"], "0 of 3 completed.");
}

#[tokio::test]
async fn steps_complete_in_order_and_persist() {
    let dir = TempDir::new().unwrap();
    let router = app(&dir);

    let (status, _) = post(router.clone(), "/api/checklist/1/steps/0/check").await;
    assert_eq!(status, StatusCode::OK);
    let (status, json) = post(router.clone(), "/api/checklist/1/steps/1/check").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["progress"], "2 of 3 completed.");

    let (_, json) = get(router, "/api/checklist/1").await;
    assert_eq!(json["completed"], 2);
    assert_eq!(json["steps"][2]["state"], "available");
}

#[tokio::test]
async fn out_of_order_check_is_rejected() {
    let dir = TempDir::new().unwrap();
    let router = app(&dir);

    let (status, json) = post(router.clone(), "/api/checklist/1/steps/2/check").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "Complete previous steps first");

    let (_, json) = get(router, "/api/checklist/1").await;
    assert_eq!(json["completed"], 0);
}

#[tokio::test]
async fn uncheck_cascades_to_later_steps() {
    let dir = TempDir::new().unwrap();
    let router = app(&dir);
    for step in 0..3 {
        post(router.clone(), &format!("/api/checklist/1/steps/{step}/check")).await;
    }

    let (status, json) = post(router, "/api/checklist/1/steps/1/uncheck").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["completed"], 1);
    assert_eq!(json["steps"][2]["state"], "locked");
}

#[tokio::test]
async fn step_out_of_range_is_400() {
    let dir = TempDir::new().unwrap();
    let (status, _) = post(app(&dir), "/api/checklist/2/steps/5/check").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checklist_for_unknown_item_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, _) = get(app(&dir), "/api/checklist/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clear_checklist_resets_progress() {
    let dir = TempDir::new().unwrap();
    let router = app(&dir);
    post(router.clone(), "/api/checklist/2/steps/0/check").await;

    let (status, json) = send(router.clone(), "DELETE", "/api/checklist/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["completed"], 0);

    let (_, json) = get(router, "/api/checklist/2").await;
    assert_eq!(json["completed"], 0);
}

// ---------------------------------------------------------------------------
// Recently viewed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn viewing_items_records_recent_history() {
    let dir = TempDir::new().unwrap();
    let router = app(&dir);
    get(router.clone(), "/api/item?id=1").await;
    get(router.clone(), "/api/item?id=2").await;
    get(router.clone(), "/api/item?id=1").await;

    let (status, json) = get(router.clone(), "/api/recent").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(json[0]["issue"], "Wifi slow");
    assert!(json[0]["viewedAt"].is_string());

    let (status, _) = send(router.clone(), "DELETE", "/api/recent").await;
    assert_eq!(status, StatusCode::OK);
    let (_, json) = get(router, "/api/recent").await;
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn not_found_lookup_does_not_touch_recent() {
    let dir = TempDir::new().unwrap();
    let router = app(&dir);
    get(router.clone(), "/api/item?id=99").await;
    let (_, json) = get(router, "/api/recent").await;
    assert_eq!(json, serde_json::json!([]));
}
