use crate::auth::extract::extract_token;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ferry_core::tokens::fingerprint;
use ferry_core::AppError;
use ferry_infra::get_request_id;
use std::sync::Arc;

/// Identity of the token that authorized the current request.
///
/// Only the fingerprint is kept so the raw token never reaches handler logs.
#[derive(Debug, Clone)]
pub struct TokenContext {
    pub fingerprint: String,
}

// Runs only once a route and method matched, so unsupported methods still get 405.
// Must precede Multipart in handler arguments: the token is checked before the body
// is read.
impl FromRequestParts<Arc<AppState>> for TokenContext {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_token(&parts.headers, &parts.uri) else {
            tracing::debug!(path = %parts.uri.path(), "Request without token");
            return Err(HttpAppError(AppError::Unauthorized));
        };

        let token_fingerprint = fingerprint(&token);
        if !state.tokens.validate(&token).await {
            tracing::warn!(
                token = %token_fingerprint,
                request_id = ?get_request_id(&parts.extensions),
                path = %parts.uri.path(),
                "Rejected invalid or expired token"
            );
            return Err(HttpAppError(AppError::Unauthorized));
        }

        Ok(TokenContext {
            fingerprint: token_fingerprint,
        })
    }
}
