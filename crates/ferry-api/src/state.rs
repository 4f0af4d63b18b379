//! Application state shared by all handlers.

use ferry_core::{Config, TokenStore};
use ferry_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenStore>,
    pub storage: Arc<dyn Storage>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, tokens: Arc<TokenStore>, storage: Arc<dyn Storage>) -> Self {
        Self {
            tokens,
            storage,
            config,
        }
    }
}
