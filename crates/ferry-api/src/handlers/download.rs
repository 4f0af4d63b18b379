use crate::auth::TokenContext;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use ferry_core::AppError;
use ferry_storage::ByteStream;
use futures::StreamExt;
use std::sync::Arc;

/// Bookkeeping carried through the response body stream.
struct Transfer {
    stream: ByteStream<'static>,
    name: String,
    sent: u64,
    expected: u64,
}

fn content_disposition(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("attachment; filename=\"{}\"", escaped)
}

/// Wrap the file stream so completion and mid-stream failures get logged.
///
/// Headers are already committed by the time the stream runs, so an I/O error can only
/// abort the body.
fn logged_body(transfer: Transfer) -> Body {
    let stream = futures::stream::unfold(Some(transfer), |state| async move {
        let mut transfer = state?;
        match transfer.stream.next().await {
            Some(Ok(chunk)) => {
                transfer.sent += chunk.len() as u64;
                Some((Ok(chunk), Some(transfer)))
            }
            Some(Err(e)) => {
                tracing::error!(
                    filename = %transfer.name,
                    sent_bytes = transfer.sent,
                    expected_bytes = transfer.expected,
                    error = %e,
                    "Download aborted mid-stream"
                );
                Some((Err(e), None))
            }
            None => {
                tracing::info!(
                    filename = %transfer.name,
                    size_bytes = transfer.sent,
                    "File downloaded"
                );
                None
            }
        }
    });
    Body::from_stream(stream)
}

#[tracing::instrument(
    skip(state),
    fields(token = %token_ctx.fingerprint, operation = "download_file")
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    token_ctx: TokenContext,
    Path(filename): Path<String>,
) -> Result<Response, HttpAppError> {
    serve_file(&state, &filename).await
}

/// `/download/a/b` serves `a`; only the first segment after the prefix names the file.
#[tracing::instrument(
    skip(state),
    fields(token = %token_ctx.fingerprint, operation = "download_file")
)]
pub async fn download_first_segment(
    State(state): State<Arc<AppState>>,
    token_ctx: TokenContext,
    Path((filename, _rest)): Path<(String, String)>,
) -> Result<Response, HttpAppError> {
    serve_file(&state, &filename).await
}

async fn serve_file(state: &AppState, filename: &str) -> Result<Response, HttpAppError> {
    let download = state.storage.open(filename).await?;

    tracing::debug!(
        filename = %download.name,
        size_bytes = download.size_bytes,
        "Streaming file from storage"
    );

    let disposition = content_disposition(&download.name);
    let size_bytes = download.size_bytes;
    let body = logged_body(Transfer {
        stream: download.stream,
        name: download.name,
        sent: 0,
        expected: size_bytes,
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Description", "File Transfer")
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::EXPIRES, "0")
        .header(header::CACHE_CONTROL, "must-revalidate")
        .header(header::PRAGMA, "public")
        .header(header::CONTENT_LENGTH, size_bytes)
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// `/download` and `/download/` name no file.
pub async fn download_missing_name(_token_ctx: TokenContext) -> HttpAppError {
    HttpAppError(AppError::BadRequest("Invalid path".to_string()))
}
