// --- File: crates/safari_api/src/lib.rs ---
//! Access to the remote safari REST API.
//!
//! [`RemoteSafariService`] talks HTTP through [`ApiClient`];
//! [`mock::InMemorySafariService`] serves the same traits from memory.

pub mod client;
pub mod error;
pub mod factory;
pub mod mock;
pub mod service;

pub use client::{ApiClient, IDEMPOTENCY_HEADER};
pub use error::ApiError;
pub use factory::SharedServiceFactory;
pub use mock::InMemorySafariService;
pub use service::RemoteSafariService;
