//! Route configuration and setup

use crate::constants::{DOWNLOAD_PREFIX, HEALTH_PATH, TOKEN_PATH, UPLOAD_PATH};
use crate::error::HttpAppError;
use crate::handlers;
use crate::middleware::method_not_allowed_body;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, map_response},
    routing::{get, post},
    Router,
};
use ferry_core::{AppError, Config};
use ferry_infra::{request_id_middleware, security_headers_middleware};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let app_state_routes = public_routes()
        .merge(protected_routes(config))
        .fallback(not_found)
        .with_state(state);

    // Layers run outer to inner: trace, request id, security headers
    app_state_routes
        .layer(map_response(method_not_allowed_body))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::help::help_page))
        .route(TOKEN_PATH, post(handlers::token::issue_token))
        .route(HEALTH_PATH, get(handlers::health::health_check))
}

/// Transfer routes. Authentication happens in the `TokenContext` extractor, so a path
/// with an unsupported method gets 405 before any token check.
fn protected_routes(config: &Config) -> Router<Arc<AppState>> {
    // Enforced by the Multipart extractor, after the token has been checked
    let body_limit = match config.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let download_file = format!("{}/{{filename}}", DOWNLOAD_PREFIX);
    let download_trailing = format!("{}/{{filename}}/", DOWNLOAD_PREFIX);
    let download_nested = format!("{}/{{filename}}/{{*rest}}", DOWNLOAD_PREFIX);
    let download_bare = format!("{}/", DOWNLOAD_PREFIX);

    Router::new()
        .route(
            UPLOAD_PATH,
            post(handlers::upload::upload_file).layer(body_limit),
        )
        .route(&download_file, get(handlers::download::download_file))
        .route(&download_trailing, get(handlers::download::download_file))
        .route(
            &download_nested,
            get(handlers::download::download_first_segment),
        )
        .route(
            DOWNLOAD_PREFIX,
            get(handlers::download::download_missing_name),
        )
        .route(
            &download_bare,
            get(handlers::download::download_missing_name),
        )
}

async fn not_found() -> HttpAppError {
    HttpAppError(AppError::NotFound("Not found".to_string()))
}
