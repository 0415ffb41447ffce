//! Delegated-authorization bridge.
//!
//! Lets a third-party client obtain a bearer credential for a user's account
//! without ever seeing the user's identity-provider credentials. The user logs
//! in through the upstream identity backend; the bridge only relays codes.
//!
//! ## Endpoints
//!
//! - `GET /oauth/authorize` - Start a delegated login and redirect to the backend
//! - `GET /oauth/callback` - Finish the login, store the token, redirect to the client
//! - `POST /oauth/token` - Exchange the client's code for the bearer token
//!
//! No pending-request table exists between the authorize and callback legs:
//! the client's `redirect_uri` and `state` travel inside the return address
//! handed to the backend.

pub mod endpoints;
pub mod return_address;
mod state;

pub use endpoints::router;
pub use state::{BridgeSettings, BridgeState};

/// Path the bridge router is nested under.
pub const BRIDGE_PREFIX: &str = "/oauth";

/// OpenAPI tag for bridge endpoints
pub const BRIDGE_TAG: &str = "Delegated Authorization";
