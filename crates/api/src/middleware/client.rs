//! Request metadata used for session records and engagement dedup.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use soundstage_core::engagement::client_ip;

/// Client address (from proxy headers) and user agent.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientMeta {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        Self {
            ip: client_ip(header("x-forwarded-for"), header("x-real-ip")).map(str::to_string),
            user_agent: headers
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientMeta::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_forwarded_ip_and_agent() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("198.51.100.4, 10.0.0.1"));
        headers.insert(USER_AGENT, HeaderValue::from_static("test-agent/1.0"));

        let meta = ClientMeta::from_headers(&headers);
        assert_eq!(meta.ip.as_deref(), Some("198.51.100.4"));
        assert_eq!(meta.user_agent.as_deref(), Some("test-agent/1.0"));
    }

    #[test]
    fn missing_headers_yield_none() {
        let meta = ClientMeta::from_headers(&HeaderMap::new());
        assert!(meta.ip.is_none());
        assert!(meta.user_agent.is_none());
    }
}
