//! Bearer credential helpers for router tests.
//!
//! Protected routes expect `Authorization: Bearer <api_key>`. `MockBearer`
//! builds that header (or a deliberately malformed variant) so tests do not
//! hand-assemble header strings.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use http::header::AUTHORIZATION;

/// API key presented by a test request.
pub struct MockBearer {
    pub api_key: String,
}

impl MockBearer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// `Authorization` header name and value pair.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).unwrap(),
        )
    }

    /// Return headers as a client would send them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        let (name, value) = self.header();
        map.insert(name, value);
        map
    }

    /// A header using the wrong scheme; must be rejected like a missing one.
    pub fn basic_scheme_header(&self) -> (HeaderName, HeaderValue) {
        (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {}", self.api_key)).unwrap(),
        )
    }
}
