//! Request extractors

pub mod auth;

pub use auth::{AdminUser, SESSION_COOKIE};
