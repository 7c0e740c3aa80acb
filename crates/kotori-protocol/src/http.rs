//! Transport-agnostic HTTP seam.
//!
//! Ledger and reaction clients build [`HttpRequest`] values and hand them to
//! an [`HttpTransport`]; only the transport implementation knows about
//! hyper. Tests substitute a scripted fake.

use async_trait::async_trait;

use crate::error::TransportError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
        }
    }
}

/// A plain HTTP request: method, absolute URL, headers, body.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn put(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Put,
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A plain HTTP response: status code and raw body.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One round trip against a remote HTTP API.
///
/// Implementations perform no retries and no caching; failure policy lives
/// with the callers.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_headers() {
        let req = HttpRequest::get("https://api.example/x")
            .with_header("Accept", "application/json")
            .with_header("User-Agent", "kotori");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.headers.len(), 2);
        assert!(req.body.is_empty());
    }

    #[test]
    fn success_range() {
        assert!(HttpResponse { status: 201, body: vec![] }.is_success());
        assert!(!HttpResponse { status: 404, body: vec![] }.is_success());
        assert!(!HttpResponse { status: 409, body: vec![] }.is_success());
    }
}
