// --- File: crates/services/safari_frontend/src/lib.rs ---
pub mod app;
pub mod service_factory;

pub use app::build_router;
pub use service_factory::build_service_factory;
