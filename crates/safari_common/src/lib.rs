// --- File: crates/safari_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod format; // Price and date formatting
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Data structures shared with the remote API
pub mod routes; // Health check
pub mod services; // Service abstractions
pub mod session; // Encrypted session, flash and draft cookies
pub mod ui; // Page shell and shared components
pub mod validation; // Form validation

// Re-export the routes function to be used by the service binary
pub use routes::routes;

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, external_service_error, forbidden, internal_error, not_found,
    validation_error, Context, HttpStatusCode, SafariError,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::{create_client, DEFAULT_TIMEOUT_SECS},
    error_response, html_response, login_redirect, redirect_response, request_target, with_cookies,
    IntoHttpResponse,
};

// Re-export logging utilities for easier access
pub use logging::{init_from_config, init_with_level, log_error, log_result, LogGuard};

pub use session::{CookieChanges, Flash, FlashKind, RequestContext, Session, SessionManager, SessionUser};
pub use ui::{render_document, render_error_document, PageContext};
