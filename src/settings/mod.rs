//! # Settings Module
//!
//! Account and profile settings: profile read/update, password change,
//! account deletion.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use routes::settings_routes;
