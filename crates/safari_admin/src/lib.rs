// --- File: crates/safari_admin/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
#[cfg(test)]
mod logic_test;
pub mod routes;
pub mod views;

pub use routes::routes;
