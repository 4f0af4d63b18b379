//! Ferry API Library
//!
//! HTTP handlers, token authentication and application setup for the Ferry file
//! transfer server.

pub mod auth;
pub mod cli;
pub mod constants;
pub mod error;
mod handlers;
mod middleware;
pub mod setup;
pub mod state;

// Re-exports
pub use error::HttpAppError;
pub use state::AppState;
