// --- File: crates/safari_booking/src/lib.rs ---
// Declare modules within this crate
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;
pub mod views;

pub use routes::routes;
