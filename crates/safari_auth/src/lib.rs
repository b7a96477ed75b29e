// --- File: crates/safari_auth/src/lib.rs ---
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
pub mod routes;
pub mod views;

pub use routes::routes;
