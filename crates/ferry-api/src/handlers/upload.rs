use crate::auth::TokenContext;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use ferry_core::constants::UPLOAD_FIELD_NAME;
use ferry_core::AppError;
use futures::{StreamExt, TryStreamExt};
use std::io;
use std::sync::Arc;

/// Store the `file` field of a multipart body in the upload directory.
///
/// The field is streamed straight into storage; the body is never held in memory.
#[tracing::instrument(
    skip(state, multipart),
    fields(token = %token_ctx.fingerprint, operation = "upload_file")
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    token_ctx: TokenContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, HttpAppError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Rejected upload body");
        AppError::BadRequest("Unable to parse form".to_string())
    })?;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return Err(AppError::BadRequest("Error retrieving file".to_string()).into())
            }
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(AppError::PayloadTooLarge("File too large".to_string()).into());
            }
            Err(e) => {
                tracing::debug!(error = %e, "Malformed multipart body");
                return Err(AppError::BadRequest("Unable to parse form".to_string()).into());
            }
        };

        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let body = field.map_err(io::Error::other).boxed();
        let stored = state.storage.put_stream(&filename, body).await?;

        tracing::info!(
            filename = %stored.name,
            upload_dir = %state.storage.root().display(),
            size_bytes = stored.size_bytes,
            "File uploaded"
        );

        return Ok(format!("File uploaded successfully: {}\n", stored.name));
    }
}
