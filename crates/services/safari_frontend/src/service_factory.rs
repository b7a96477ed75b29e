// --- File: crates/services/safari_frontend/src/service_factory.rs ---
//! Picks the backend behind the service traits.
//!
//! Production talks to the remote REST API. With `use_demo_data` the bundled
//! demo data is served from memory, which is handy for local development and
//! presentations without a running API.
use safari_api::{ApiClient, InMemorySafariService, RemoteSafariService, SharedServiceFactory};
use safari_common::services::ServiceFactory;
use safari_common::SafariError;
use safari_config::AppConfig;
use std::sync::Arc;
use tracing::{info, warn};

pub fn build_service_factory(config: &AppConfig) -> Result<Arc<dyn ServiceFactory>, SafariError> {
    if config.use_demo_data {
        warn!("serving built-in demo data, the remote API is not used");
        let backend = Arc::new(InMemorySafariService::demo()?);
        return Ok(Arc::new(SharedServiceFactory::new(backend)));
    }

    let client = ApiClient::from_config(&config.api)?;
    info!("using remote API at {}", client.base_url());
    let backend = Arc::new(RemoteSafariService::new(client));
    Ok(Arc::new(SharedServiceFactory::new(backend)))
}
