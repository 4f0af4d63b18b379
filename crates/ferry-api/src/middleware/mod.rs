//! Response shaping applied to every route.

use crate::error::HttpAppError;
use axum::{
    http::{header::ALLOW, StatusCode},
    response::{IntoResponse, Response},
};
use ferry_core::AppError;

/// Give the router's bare 405 responses the same plain-text body as other errors.
///
/// The `Allow` header computed by the router is carried over.
pub async fn method_not_allowed_body(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(ALLOW).cloned();
    let mut replaced = HttpAppError(AppError::MethodNotAllowed).into_response();
    if let Some(allow) = allow {
        replaced.headers_mut().insert(ALLOW, allow);
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn test_rewrites_405_and_keeps_allow() {
        let mut original = StatusCode::METHOD_NOT_ALLOWED.into_response();
        original
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static("POST"));

        let response = method_not_allowed_body(original).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(ALLOW).unwrap(), "POST");

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Method not allowed");
    }

    #[tokio::test]
    async fn test_other_statuses_untouched() {
        let response = method_not_allowed_body((StatusCode::OK, "fine").into_response()).await;
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"fine");
    }
}
