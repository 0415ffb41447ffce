//! Delegated-authorization bridge.
//!
//! Issues bearer credentials to third-party clients on behalf of a user who
//! authenticates through an upstream identity backend. The client never sees
//! the user's identity-provider credentials.

pub mod api;
pub mod bridge;
pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod store;
