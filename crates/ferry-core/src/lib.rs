//! Ferry Core Library
//!
//! This crate provides the configuration, error types, clock abstraction and the
//! bearer token store shared by all Ferry components.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod tokens;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use tokens::{Token, TokenError, TokenStore};
