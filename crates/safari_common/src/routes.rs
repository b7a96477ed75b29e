// --- File: crates/safari_common/src/routes.rs ---
use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Routes shared by every deployment, currently only `/health`.
pub fn routes() -> Router {
    Router::new().route("/health", get(health))
}
