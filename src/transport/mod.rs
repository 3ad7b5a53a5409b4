//! HTTP transport boundary.
//!
//! The resolution core never talks to `reqwest` directly; it goes through the
//! `Transport` trait so the connection pool, timeouts and TLS stay owned by
//! one collaborator (and so tests can script responses).

use serde_json::Value;
use thiserror::Error;

pub mod http;
#[cfg(test)]
pub(crate) mod scripted;

pub use http::HttpTransport;

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (connect, timeout, pool wait, body read).
#[derive(Debug, Error)]
#[error("{method} {url} failed: {message}")]
pub struct TransportError {
    pub method: &'static str,
    pub url: String,
    pub message: String,
}

pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportError>;

    fn patch_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportError>;
}
