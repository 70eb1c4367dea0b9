//! In-memory implementation of the roster HTTP API.
//!
//! Serves the same four endpoints as the production backend from a
//! [`RosterStore`], for local development and end-to-end tests of the client.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod store;

pub use config::TestServerConfig;
pub use handlers::AppState;
pub use module::{spawn, RunningServer, TestServerModule};
pub use store::{demo_roster, RosterStore, StoreCall, StoreError};
