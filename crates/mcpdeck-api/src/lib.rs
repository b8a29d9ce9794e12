//! Backend-for-frontend for the MCP admin console
//!
//! Serves workflow graphs for MCP servers, validates and persists edits made
//! on the workflow canvas, and relays the tool-creation chat as Server-Sent
//! Events.

pub mod config;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod retry;
pub mod router;
pub mod routes;
pub mod state;
pub mod upstream;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
