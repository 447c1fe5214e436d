use sea_orm::Database;
use tracing::info;

use crumbs_api::config::CrumbsConfig;
use crumbs_api::router::build_router;
use crumbs_api::state::AppState;
use crumbs_core::config::Config;

#[tokio::main]
async fn main() {
    crumbs_core::tracing::init_tracing("crumbs_api=info,tower_http=info");

    let config = CrumbsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState::new(db, &config);
    if state.places.api_key.is_none() {
        info!("GOOGLE_PLACES_API_KEY not set, place lookup disabled");
    }

    let router = build_router(state, &config.allowed_origins());
    let addr = format!("0.0.0.0:{}", config.crumbs_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("crumbs api listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
