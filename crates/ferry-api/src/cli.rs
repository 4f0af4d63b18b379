//! Command-line flags. Each flag overrides the matching environment variable.

use clap::Parser;
use ferry_core::Config;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "ferry", about = "File server with token authentication")]
pub struct Cli {
    /// Server address [env: FERRY_SERVER, default: localhost]
    #[arg(long)]
    pub server: Option<String>,

    /// Server port [env: FERRY_PORT, default: 8080]
    #[arg(long)]
    pub port: Option<u16>,

    /// Upload directory path [env: FERRY_UPLOAD_DIR, default: uploads]
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,

    /// Token lifetime in seconds [env: FERRY_TOKEN_TTL_SECS, default: 3600]
    #[arg(long)]
    pub token_ttl_secs: Option<u64>,

    /// Seconds between expired-token sweeps [env: FERRY_RECLAIM_INTERVAL_SECS, default: 600]
    #[arg(long)]
    pub reclaim_interval_secs: Option<u64>,

    /// Reject upload bodies larger than this many MiB [env: FERRY_MAX_UPLOAD_MB]
    #[arg(long)]
    pub max_upload_mb: Option<usize>,

    /// Emit logs as JSON lines (always on when ENVIRONMENT=production)
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    pub fn apply(&self, config: &mut Config) {
        if let Some(server) = &self.server {
            config.server_addr = server.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = &self.upload_dir {
            config.upload_dir = dir.clone();
        }
        if let Some(secs) = self.token_ttl_secs {
            config.token_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = self.reclaim_interval_secs {
            config.reclaim_interval = Duration::from_secs(secs);
        }
        if let Some(mb) = self.max_upload_mb {
            config.max_upload_bytes = Some(mb.saturating_mul(1024 * 1024));
        }
    }
}
