// File: crates/safari_content/src/routes.rs
use axum::{routing::get, Router};
use safari_common::services::ServiceFactory;
use safari_common::session::SessionManager;
use safari_common::SafariError;
use safari_config::AppConfig;
use std::sync::Arc;

use crate::content::SiteContent;
use crate::handlers::{
    about_handler, contact_form_handler, contact_submit_handler, faq_handler, home_handler,
    packing_list_handler, tour_detail_handler, tours_handler, visa_detail_handler,
    visa_index_handler, ContentState,
};

/// Creates the router for the marketing and information pages.
///
/// Fails only when the bundled content files cannot be parsed.
pub fn routes(
    config: Arc<AppConfig>,
    services: Arc<dyn ServiceFactory>,
    sessions: SessionManager,
) -> Result<Router, SafariError> {
    let content = SiteContent::load()?;
    let state = Arc::new(ContentState {
        config,
        services,
        sessions,
        content: Arc::new(content),
    });

    Ok(Router::new()
        .route("/", get(home_handler))
        .route("/tours", get(tours_handler))
        .route("/tours/{tour_id}", get(tour_detail_handler))
        .route("/about", get(about_handler))
        .route("/faq", get(faq_handler))
        .route("/visa-info", get(visa_index_handler))
        .route("/visa-info/{country}", get(visa_detail_handler))
        .route("/packing-list", get(packing_list_handler))
        .route("/contact", get(contact_form_handler).post(contact_submit_handler))
        .with_state(state))
}
