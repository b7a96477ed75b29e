// File: crates/safari_auth/src/routes.rs
use axum::{
    routing::{get, post},
    Router,
};
use safari_common::services::ServiceFactory;
use safari_common::session::SessionManager;
use safari_config::AppConfig;
use std::sync::Arc;

use crate::handlers::{
    forgot_password_form_handler, forgot_password_submit_handler, login_form_handler,
    login_submit_handler, logout_handler, register_form_handler, register_submit_handler,
    reset_password_form_handler, reset_password_submit_handler, verify_email_handler, AuthState,
};

/// Creates a router containing the sign in, registration and password recovery pages.
pub fn routes(config: Arc<AppConfig>, services: Arc<dyn ServiceFactory>, sessions: SessionManager) -> Router {
    let auth_state = Arc::new(AuthState {
        config,
        services,
        sessions,
    });

    Router::new()
        .route("/login", get(login_form_handler).post(login_submit_handler))
        .route("/logout", post(logout_handler))
        .route("/register", get(register_form_handler).post(register_submit_handler))
        .route("/verify-email/{token}", get(verify_email_handler))
        .route(
            "/forgot-password",
            get(forgot_password_form_handler).post(forgot_password_submit_handler),
        )
        .route(
            "/reset-password/{token}",
            get(reset_password_form_handler).post(reset_password_submit_handler),
        )
        .with_state(auth_state)
}
