//! Client metadata extractor.
//!
//! Captures the requester's IP and user agent for the audit fields on
//! comments and subscriber records. The IP is taken from proxy headers
//! (the service always runs behind one); both fields fall back to
//! `"unknown"` rather than failing the request.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};

/// Requester metadata captured at subscription/comment time.
#[derive(Debug, Clone)]
pub struct ClientMeta {
    pub ip: String,
    pub user_agent: String,
}

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(from_headers(&parts.headers))
    }
}

fn from_headers(headers: &HeaderMap) -> ClientMeta {
    // X-Forwarded-For carries a chain; the first entry is the client.
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .unwrap_or("unknown")
        .to_string();

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    ClientMeta { ip, user_agent }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );

        let meta = from_headers(&headers);
        assert_eq!(meta.ip, "203.0.113.7");
        assert_eq!(meta.user_agent, "unknown");
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        headers.insert("user-agent", HeaderValue::from_static("test-agent/1.0"));

        let meta = from_headers(&headers);
        assert_eq!(meta.ip, "198.51.100.4");
        assert_eq!(meta.user_agent, "test-agent/1.0");
    }

    #[test]
    fn test_missing_headers_are_unknown() {
        let meta = from_headers(&HeaderMap::new());
        assert_eq!(meta.ip, "unknown");
        assert_eq!(meta.user_agent, "unknown");
    }
}
