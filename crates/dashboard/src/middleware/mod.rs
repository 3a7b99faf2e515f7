//! Request extractors for authentication.

pub mod auth;

pub use auth::{RequireAdminKey, SessionToken};
