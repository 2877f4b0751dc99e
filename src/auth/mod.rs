//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Password signup/login with bcrypt hashing
//! - Google OAuth authentication
//! - JWT session token signing and verification
//! - Session cookie lifecycle
//! - AuthedUser extractor for protected routes

pub mod cookie;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod token;
pub mod validators;

#[cfg(test)]
mod tests;

pub use extractors::AuthedUser;
pub use models::User;
pub use routes::auth_routes;
