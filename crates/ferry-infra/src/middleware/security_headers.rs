use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};

/// Adds browser hardening headers to every response.
///
/// The CSP only allows inline styles, which is all the static help page needs.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    // Downloads are always octet-stream; never let a browser sniff them into HTML
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));

    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static("default-src 'none'; style-src 'unsafe-inline'"),
    );

    response
}
