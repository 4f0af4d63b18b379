use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::State;
use ferry_core::AppError;
use std::sync::Arc;

/// Issue a fresh bearer token. The body is the raw token and nothing else.
#[tracing::instrument(skip(state), fields(operation = "issue_token"))]
pub async fn issue_token(State(state): State<Arc<AppState>>) -> Result<String, HttpAppError> {
    let (token, expires_at) = state.tokens.issue().await.map_err(AppError::from)?;

    tracing::info!(
        token = %token.fingerprint(),
        expires_at = %expires_at.to_rfc3339(),
        "Issued token"
    );

    Ok(token.into_string())
}
