//! Business logic services for the dashboard.

pub mod auth;
pub mod email;
pub mod runtime;

pub use email::EmailService;
