// File: crates/services/safari_frontend/src/main.rs
use safari_common::logging::{init_from_config, log_result};
use safari_common::session::SessionManager;
use safari_common::ui::SiteBrand;
use safari_common::{config_error, SafariError};
use safari_config::load_config;
use safari_frontend::{build_router, build_service_factory};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutdown requested, finishing open requests");
}

#[tokio::main]
async fn main() -> Result<(), SafariError> {
    let config = Arc::new(load_config().map_err(config_error)?);
    let _log_guard = init_from_config(&config.logging);

    SiteBrand::install(&config.site);
    let services = log_result(
        build_service_factory(&config),
        "service factory ready",
        "Failed to set up the API services",
    )?;
    let sessions = SessionManager::from_config(&config.session)?;
    let app = build_router(config.clone(), services, sessions)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|err| config_error(format!("cannot bind {}: {}", addr, err)))?;
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| SafariError::InternalError(format!("server error: {}", err)))?;

    info!("server stopped");
    Ok(())
}
