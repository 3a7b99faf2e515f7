//! Domain models for the dashboard.

pub mod session;

pub use session::{CurrentUser, UserInfoHint, cookies};
