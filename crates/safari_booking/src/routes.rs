// File: crates/safari_booking/src/routes.rs
use axum::{
    routing::{get, post},
    Router,
};
use safari_common::services::ServiceFactory;
use safari_common::session::SessionManager;
use safari_config::AppConfig;
use std::sync::Arc;

use crate::handlers::{
    cancel_booking_handler, confirm_handler, my_bookings_handler, review_handler,
    travellers_form_handler, travellers_submit_handler, trip_form_handler, trip_submit_handler,
    BookingState,
};
use crate::logic::BookingRules;

/// Creates a router containing the booking flow and the customer's booking list.
pub fn routes(config: Arc<AppConfig>, services: Arc<dyn ServiceFactory>, sessions: SessionManager) -> Router {
    let rules = BookingRules::from_config(&config.booking);
    let booking_state = Arc::new(BookingState {
        config,
        services,
        sessions,
        rules,
    });

    Router::new()
        .route("/book/{tour_id}", get(trip_form_handler).post(trip_submit_handler))
        .route(
            "/book/{tour_id}/travellers",
            get(travellers_form_handler).post(travellers_submit_handler),
        )
        .route("/book/{tour_id}/review", get(review_handler))
        .route("/book/{tour_id}/confirm", post(confirm_handler))
        .route("/my-bookings", get(my_bookings_handler))
        .route("/my-bookings/{booking_id}/cancel", post(cancel_booking_handler))
        .with_state(booking_state)
}
