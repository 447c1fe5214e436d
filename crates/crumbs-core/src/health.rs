use axum::{extract::State, http::StatusCode};
use sea_orm::DatabaseConnection;

/// `GET /healthz`: the process is up.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`: the database answers a ping.
pub async fn readyz(State(db): State<DatabaseConnection>) -> StatusCode {
    match db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
