//! Route paths served by the API.

pub const TOKEN_PATH: &str = "/token";
pub const UPLOAD_PATH: &str = "/upload";
/// Prefix of download URLs; the filename is the single segment that follows.
pub const DOWNLOAD_PREFIX: &str = "/download";
pub const HEALTH_PATH: &str = "/health";
