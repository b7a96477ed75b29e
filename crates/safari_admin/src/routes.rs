// File: crates/safari_admin/src/routes.rs
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use safari_common::services::ServiceFactory;
use safari_common::session::SessionManager;
use safari_config::AppConfig;
use std::sync::Arc;

use crate::auth::{admin_guard_middleware, AdminGuardState};
use crate::handlers::{
    booking_status_handler, bookings_handler, create_tour_handler, dashboard_handler, delete_tour_handler,
    delete_user_handler, edit_tour_handler, new_tour_handler, tours_handler, update_tour_handler,
    update_user_handler, users_handler, AdminState,
};

/// Creates the admin router. Every route sits behind the admin guard.
pub fn routes(config: Arc<AppConfig>, services: Arc<dyn ServiceFactory>, sessions: SessionManager) -> Router {
    let guard_state = Arc::new(AdminGuardState {
        config: config.clone(),
        sessions: sessions.clone(),
    });
    let admin_state = Arc::new(AdminState {
        config,
        services,
        sessions,
    });

    Router::new()
        .route("/admin", get(dashboard_handler))
        .route("/admin/users", get(users_handler))
        .route("/admin/users/{user_id}", post(update_user_handler))
        .route("/admin/users/{user_id}/delete", post(delete_user_handler))
        .route("/admin/bookings", get(bookings_handler))
        .route("/admin/bookings/{booking_id}/status", post(booking_status_handler))
        .route("/admin/tours", get(tours_handler).post(create_tour_handler))
        .route("/admin/tours/new", get(new_tour_handler))
        .route("/admin/tours/{tour_id}", post(update_tour_handler))
        .route("/admin/tours/{tour_id}/edit", get(edit_tour_handler))
        .route("/admin/tours/{tour_id}/delete", post(delete_tour_handler))
        .layer(middleware::from_fn_with_state(guard_state, admin_guard_middleware))
        .with_state(admin_state)
}
