//! Ferry Infrastructure Library
//!
//! Shared infrastructure used by the Ferry server:
//! - Middleware (request ID, security headers)
//! - Telemetry initialization
//! - Background token reclamation

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "cleanup")]
pub mod cleanup;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, RequestId,
};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

#[cfg(feature = "cleanup")]
pub use cleanup::TokenReclaimer;
