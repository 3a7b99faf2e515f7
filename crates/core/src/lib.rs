//! Vexa Core - Shared types library.
//!
//! This crate provides common types used across the Vexa dashboard components:
//! - `dashboard` - Backend-for-frontend serving the web dashboard
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails
//! - [`status`] - Meeting lifecycle state model and transition timeline

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod status;
pub mod types;

pub use status::*;
pub use types::*;
