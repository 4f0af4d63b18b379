//! Configuration module
//!
//! Configuration is resolved once at start-up: built-in defaults, then `.env`, then
//! environment variables. The binary layers command-line flags on top before calling
//! [`Config::validate`]. The resulting value is immutable for the life of the process.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_PORT, DEFAULT_SERVER_ADDR, DEFAULT_UPLOAD_DIR, RECLAIM_INTERVAL, TOKEN_TTL,
};

#[derive(Clone, Debug)]
pub struct Config {
    /// Host the listener binds to; also rendered on the help page.
    pub server_addr: String,
    pub port: u16,
    /// Flat directory holding uploaded files.
    pub upload_dir: PathBuf,
    pub token_ttl: Duration,
    pub reclaim_interval: Duration,
    /// Optional cap on upload request bodies. `None` leaves uploads unbounded.
    pub max_upload_bytes: Option<usize>,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            token_ttl: TOKEN_TTL,
            reclaim_interval: RECLAIM_INTERVAL,
            max_upload_bytes: None,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let server_addr = env::var("FERRY_SERVER").unwrap_or(defaults.server_addr);

        let port = match env::var("FERRY_PORT").or_else(|_| env::var("PORT")) {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("Invalid FERRY_PORT '{}': {}", raw, e))?,
            Err(_) => defaults.port,
        };

        let upload_dir = env::var("FERRY_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let token_ttl = parse_secs("FERRY_TOKEN_TTL_SECS")?.unwrap_or(defaults.token_ttl);
        let reclaim_interval =
            parse_secs("FERRY_RECLAIM_INTERVAL_SECS")?.unwrap_or(defaults.reclaim_interval);

        let max_upload_bytes = match env::var("FERRY_MAX_UPLOAD_MB") {
            Ok(raw) => {
                let mb = raw
                    .trim()
                    .parse::<usize>()
                    .map_err(|e| anyhow::anyhow!("Invalid FERRY_MAX_UPLOAD_MB '{}': {}", raw, e))?;
                Some(mb.saturating_mul(1024 * 1024))
            }
            Err(_) => None,
        };

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or(defaults.environment);

        Ok(Config {
            server_addr,
            port,
            upload_dir,
            token_ttl,
            reclaim_interval,
            max_upload_bytes,
            environment,
        })
    }

    /// Fail fast on values the server cannot run with.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server_addr.trim().is_empty() {
            return Err(anyhow::anyhow!("Server address must not be empty"));
        }

        if self.port == 0 {
            return Err(anyhow::anyhow!("Port must be between 1 and 65535"));
        }

        if self.upload_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Upload directory must not be empty"));
        }

        if self.token_ttl.is_zero() {
            return Err(anyhow::anyhow!("Token TTL must be greater than zero"));
        }

        if self.reclaim_interval.is_zero() {
            return Err(anyhow::anyhow!(
                "Token reclaim interval must be greater than zero"
            ));
        }

        if self.max_upload_bytes == Some(0) {
            return Err(anyhow::anyhow!(
                "Maximum upload size must be greater than zero when set"
            ));
        }

        Ok(())
    }

    /// `host:port` the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.port)
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn parse_secs(var: &str) -> Result<Option<Duration>, anyhow::Error> {
    match env::var(var) {
        Ok(raw) => {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", var, raw, e))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}
