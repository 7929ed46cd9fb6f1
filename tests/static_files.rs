//! The server hosts the built frontend next to the JSON API

mod common;

use std::fs;

use common::TestApp;

const INDEX_HTML: &str = "<!doctype html><title>Stockroom</title><div id=\"root\"></div>";
const APP_JS: &str = "console.log(\"stockroom\");";

fn write_dist() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("stockroom-dist-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create dist dir");
    fs::write(dir.join("index.html"), INDEX_HTML).expect("write index");
    fs::write(dir.join("app.js"), APP_JS).expect("write app.js");
    dir
}

#[tokio::test]
async fn assets_and_spa_fallback_are_served() {
    let dist = write_dist();
    let app = TestApp::spawn_with(|config| config.static_dir = dist.clone()).await;
    let http = reqwest::Client::new();

    // real file: served as-is
    let asset = http
        .get(format!("{}/app.js", app.base_url()))
        .send()
        .await
        .expect("get app.js");
    assert_eq!(asset.status(), 200);
    assert_eq!(asset.text().await.expect("body"), APP_JS);

    // client-side route: falls back to index.html so the SPA router can
    // take over after a hard refresh
    for path in ["/", "/inventory", "/suppliers/some-deep-link"] {
        let page = http
            .get(format!("{}{}", app.base_url(), path))
            .send()
            .await
            .expect("get page");
        assert_eq!(page.status(), 200, "{path}");
        assert_eq!(page.text().await.expect("body"), INDEX_HTML, "{path}");
    }

    fs::remove_dir_all(&dist).ok();
}

#[tokio::test]
async fn api_routes_win_over_the_fallback() {
    let dist = write_dist();
    let app = TestApp::spawn_with(|config| config.static_dir = dist.clone()).await;
    let http = reqwest::Client::new();

    // an unauthenticated API call must surface the JSON error contract,
    // never the index page
    let response = http
        .get(format!("{}/api/inventory", app.base_url()))
        .send()
        .await
        .expect("get inventory");
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["error"], "Missing authorization header");

    let health = http
        .get(format!("{}/health", app.base_url()))
        .send()
        .await
        .expect("get health");
    assert_eq!(health.status(), 200);
    let body: serde_json::Value = health.json().await.expect("health json");
    assert_eq!(body["status"], "ok");

    fs::remove_dir_all(&dist).ok();
}

#[tokio::test]
async fn missing_dist_directory_does_not_break_the_api() {
    // default test config points at a directory that does not exist
    let app = TestApp::spawn().await;
    let client = app.logged_in_client().await;

    let items = client.list_items().await.expect("api still works");
    assert!(items.is_empty());

    // a page request cannot be satisfied, but it fails cleanly
    let response = reqwest::Client::new()
        .get(format!("{}/inventory", app.base_url()))
        .send()
        .await
        .expect("get page");
    assert_eq!(response.status(), 404);
}
