//! # Entries Module
//!
//! Diary entry CRUD with cursor pagination and per-entry ownership checks.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;

#[cfg(test)]
mod tests;

pub use models::Entry;
pub use routes::entries_routes;
