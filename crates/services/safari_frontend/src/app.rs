// --- File: crates/services/safari_frontend/src/app.rs ---
use axum::{extract::State, http::HeaderMap, response::Response, Router};
use safari_common::http::error_response;
use safari_common::not_found;
use safari_common::services::ServiceFactory;
use safari_common::session::SessionManager;
use safari_common::SafariError;
use safari_config::AppConfig;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct FallbackState {
    config: Arc<AppConfig>,
    sessions: SessionManager,
}

async fn not_found_handler(State(state): State<Arc<FallbackState>>, headers: HeaderMap) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let err = not_found("The page you are looking for does not exist or has moved.");
    error_response(&mut ctx, &state.config.site, err)
}

/// Merges every feature router, static files and the 404 page into the
/// application router.
pub fn build_router(
    config: Arc<AppConfig>,
    services: Arc<dyn ServiceFactory>,
    sessions: SessionManager,
) -> Result<Router, SafariError> {
    let content_router = safari_content::routes(config.clone(), services.clone(), sessions.clone())?;
    let auth_router = safari_auth::routes(config.clone(), services.clone(), sessions.clone());
    let booking_router = safari_booking::routes(config.clone(), services.clone(), sessions.clone());
    let admin_router = safari_admin::routes(config.clone(), services, sessions.clone());

    let fallback_router = Router::new()
        .fallback(not_found_handler)
        .with_state(Arc::new(FallbackState {
            config: config.clone(),
            sessions,
        }));

    let app = Router::new()
        .merge(safari_common::routes())
        .merge(content_router)
        .merge(auth_router)
        .merge(booking_router)
        .merge(admin_router)
        .nest_service("/static", ServeDir::new(&config.server.static_dir))
        .merge(fallback_router)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
