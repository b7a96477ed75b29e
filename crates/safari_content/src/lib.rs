// --- File: crates/safari_content/src/lib.rs ---
// Declare modules within this crate
pub mod content;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
pub mod routes;
pub mod views;

pub use routes::routes;
