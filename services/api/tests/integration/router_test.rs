use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use crumbs_api::config::CrumbsConfig;
use crumbs_api::router::build_router;
use crumbs_api::state::AppState;
use crumbs_core::config::Config;
use crumbs_testing::auth::MockBearer;

/// Router over a disconnected database: only paths that never reach storage
/// are exercised here.
fn server() -> TestServer {
    let config = CrumbsConfig::from_pairs(vec![(
        "DATABASE_URL".to_owned(),
        "postgres://unused/crumbs".to_owned(),
    )])
    .unwrap();
    let state = AppState::new(DatabaseConnection::Disconnected, &config);
    TestServer::new(build_router(state, &config.allowed_origins())).unwrap()
}

#[tokio::test]
async fn should_answer_liveness_without_database() {
    let server = server();
    server.get("/healthz").await.assert_status_ok();
    server
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_reject_protected_routes_without_bearer() {
    let server = server();
    for path in ["/auth/me", "/restaurants", "/tags", "/config/options"] {
        let res = server.get(path).await;
        res.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = res.json();
        assert_eq!(body["kind"], "INVALID_API_KEY", "{path}");
    }
}

#[tokio::test]
async fn should_reject_non_bearer_scheme() {
    let server = server();
    let (name, value) = MockBearer::new("crumbs_abc").basic_scheme_header();
    let res = server.get("/auth/me").add_header(name, value).await;
    res.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_short_place_query() {
    let server = server();
    let res = server.get("/places/search").add_query_param("q", "a").await;
    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["kind"], "INVALID_QUERY");
}

#[tokio::test]
async fn should_report_places_unconfigured() {
    let server = server();
    let res = server
        .get("/places/search")
        .add_query_param("q", "pizza")
        .await;
    res.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let res = server.get("/places/details/abc").await;
    res.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json();
    assert_eq!(body["kind"], "PLACES_NOT_CONFIGURED");
}

#[tokio::test]
async fn should_reject_malformed_register_body() {
    let server = server();
    let res = server
        .post("/auth/register")
        .json(&json!({ "email": "alice@example.com" }))
        .await;
    res.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
