//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use showreel_catalog::Catalog;
use showreel_playback::application::player::{PlayerConfig, PlayerHandle, spawn_player};
use showreel_test_support::{fixed_clock, long_running_catalog};
use tower::ServiceExt;

use showreel_api::state::AppState;

/// Build the full app router over `catalog`, returning the player handle so
/// tests can drive or stop playback directly.
pub fn build_test_app_with(catalog: Arc<Catalog>) -> (Router, PlayerHandle) {
    let player = spawn_player(
        Arc::clone(&catalog),
        Arc::new(fixed_clock()),
        PlayerConfig::default(),
    )
    .unwrap();
    let app = showreel_api::app(AppState::new(player.clone(), catalog));
    (app, player)
}

/// Build the full app router over a catalog whose steps last an hour, so
/// playback state does not move while a test runs.
pub fn build_test_app() -> (Router, PlayerHandle) {
    build_test_app_with(long_running_catalog())
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap_or_default();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
