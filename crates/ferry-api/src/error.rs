//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors convert into
//! `HttpAppError`, which renders as a plain-text body with the matching status code.
//! Internal details are logged, never sent to the client.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ferry_core::{AppError, ErrorMetadata, LogLevel};
use ferry_storage::StorageError;

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: both the trait and AppError live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    let detail = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %detail, error_type, error_code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %detail, error_type, error_code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %detail, error_type, error_code, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, app_error.client_message()).into_response()
    }
}

fn internal(message: &str, err: StorageError) -> AppError {
    AppError::InternalWithSource {
        message: message.to_string(),
        source: anyhow::Error::new(err),
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::InvalidKey(_) => AppError::BadRequest("Invalid filename".to_string()),
            StorageError::NotFound(_) => AppError::NotFound("File not found".to_string()),
            StorageError::SourceFailed(ref io_err) => {
                let too_large = io_err
                    .get_ref()
                    .and_then(|inner| inner.downcast_ref::<MultipartError>())
                    .is_some_and(|e| e.status() == StatusCode::PAYLOAD_TOO_LARGE);
                if too_large {
                    AppError::PayloadTooLarge("File too large".to_string())
                } else {
                    tracing::debug!(error = %err, "Upload body ended abnormally");
                    AppError::BadRequest("Unable to parse form".to_string())
                }
            }
            e @ StorageError::DirectoryFailed(_) => {
                internal("Unable to create upload directory", e)
            }
            e @ StorageError::CreateFailed(_) => internal("Unable to create file", e),
            e @ StorageError::WriteFailed(_) => internal("Unable to save file", e),
            e @ StorageError::OpenFailed(_) => internal("Unable to open file", e),
            e @ StorageError::IoError(_) => internal("Internal server error", e),
        };
        HttpAppError(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn status_of(err: StorageError) -> u16 {
        let HttpAppError(app_err) = err.into();
        app_err.http_status_code()
    }

    #[test]
    fn test_storage_errors_map_to_statuses() {
        assert_eq!(status_of(StorageError::InvalidKey("..".into())), 400);
        assert_eq!(status_of(StorageError::NotFound("a".into())), 404);
        assert_eq!(status_of(StorageError::CreateFailed("a".into())), 500);
        assert_eq!(status_of(StorageError::WriteFailed("a".into())), 500);
        assert_eq!(status_of(StorageError::DirectoryFailed("a".into())), 500);
        assert_eq!(status_of(StorageError::OpenFailed("a".into())), 500);
        assert_eq!(
            status_of(StorageError::SourceFailed(io::Error::other("reset"))),
            400
        );
    }

    #[test]
    fn test_internal_details_stay_out_of_body() {
        let HttpAppError(app_err) =
            StorageError::CreateFailed("/srv/secret/path: permission denied".into()).into();
        assert_eq!(app_err.client_message(), "Unable to create file");
        assert!(app_err.detailed_message().contains("permission denied"));
    }

    #[tokio::test]
    async fn test_response_is_plain_text() {
        let response = HttpAppError(AppError::Unauthorized).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let content_type = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("text/plain"));

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Unauthorized");
    }
}
