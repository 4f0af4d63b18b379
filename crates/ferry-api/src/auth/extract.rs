use axum::{
    extract::Query,
    http::{header::AUTHORIZATION, HeaderMap, Uri},
};
use ferry_core::constants::TOKEN_QUERY_PARAM;
use std::collections::HashMap;

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the presented token from the request.
///
/// A non-empty `Authorization` header wins; the value is used as-is, with an optional
/// `Bearer ` prefix stripped. Otherwise the `token` query parameter is used.
pub fn extract_token(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty());

    if let Some(value) = header {
        let token = value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim();
        return Some(token.to_string());
    }

    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(uri).ok()?;
    params
        .get(TOKEN_QUERY_PARAM)
        .filter(|t| !t.is_empty())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(auth: Option<&'static str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(value) = auth {
            map.insert(AUTHORIZATION, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_header_value_used_verbatim() {
        let uri: Uri = "/upload".parse().unwrap();
        assert_eq!(
            extract_token(&headers(Some("abc123")), &uri).as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn test_bearer_prefix_stripped() {
        let uri: Uri = "/upload".parse().unwrap();
        assert_eq!(
            extract_token(&headers(Some("Bearer abc123")), &uri).as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn test_query_param_fallback() {
        let uri: Uri = "/download/a.txt?token=xyz".parse().unwrap();
        assert_eq!(extract_token(&headers(None), &uri).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_header_takes_precedence_over_query() {
        let uri: Uri = "/download/a.txt?token=xyz".parse().unwrap();
        assert_eq!(
            extract_token(&headers(Some("abc")), &uri).as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_missing_everywhere() {
        let uri: Uri = "/upload?token=".parse().unwrap();
        assert_eq!(extract_token(&headers(None), &uri), None);
        let uri: Uri = "/upload".parse().unwrap();
        assert_eq!(extract_token(&headers(None), &uri), None);
    }
}
