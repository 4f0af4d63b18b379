//! Application-wide constants and defaults.

use std::time::Duration;

/// Lifetime of an issued bearer token.
pub const TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Period between two sweeps of the token reclaimer.
pub const RECLAIM_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Number of random bytes behind a token (rendered as twice as many hex chars).
pub const TOKEN_BYTES: usize = 16;

/// Number of hex characters kept when logging a token fingerprint.
pub const TOKEN_FINGERPRINT_LEN: usize = 12;

pub const DEFAULT_SERVER_ADDR: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Query parameter consulted when no `Authorization` header is present.
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD_NAME: &str = "file";
