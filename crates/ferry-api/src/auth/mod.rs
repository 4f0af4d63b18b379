//! Bearer token authentication for the transfer routes.

pub mod extract;
pub mod models;

pub use extract::extract_token;
pub use models::TokenContext;
