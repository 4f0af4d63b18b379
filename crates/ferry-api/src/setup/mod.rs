//! Application setup and initialization
//!
//! Wiring lives here rather than in `main.rs` so the integration tests can build the
//! same router against a temporary directory and a controllable clock.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use axum::Router;
use ferry_core::{Clock, Config, SystemClock, TokenStore};
use ferry_infra::TokenReclaimer;
use ferry_storage::LocalStorage;
use std::sync::Arc;

/// Everything `start_server` needs.
pub struct App {
    pub state: Arc<AppState>,
    pub router: Router,
    pub reclaimer: TokenReclaimer,
}

/// Build shared state over the local upload directory.
pub fn build_state(config: Config, clock: Arc<dyn Clock>) -> Arc<AppState> {
    let tokens = Arc::new(TokenStore::new(config.token_ttl, clock));
    let storage = Arc::new(LocalStorage::new(config.upload_dir.clone()));
    Arc::new(AppState::new(config, tokens, storage))
}

/// Initialize the entire application
pub fn initialize_app(config: Config) -> Result<App> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment,
        upload_dir = %config.upload_dir.display(),
        token_ttl_secs = config.token_ttl.as_secs(),
        reclaim_interval_secs = config.reclaim_interval.as_secs(),
        max_upload_bytes = ?config.max_upload_bytes,
        "Configuration loaded and validated successfully"
    );

    let state = build_state(config.clone(), Arc::new(SystemClock));
    let router = routes::setup_routes(&config, state.clone());
    let reclaimer = TokenReclaimer::new(state.tokens.clone(), config.reclaim_interval);

    Ok(App {
        state,
        router,
        reclaimer,
    })
}
