//! `reqwest` blocking transport.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;

use super::{HttpResponse, Transport, TransportError};
use crate::config::ClientConfig;
use crate::error::{ProfileError, ProfileResult};

/// Pooled blocking HTTP client.
///
/// Pool exhaustion and timeouts surface as `TransportError`; nothing here retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn from_config(config: &ClientConfig) -> ProfileResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_max_idle_per_host(config.pool_max_idle)
            .pool_idle_timeout(Duration::from_millis(config.pool_idle_timeout_ms))
            .build()
            .map_err(|e| ProfileError::Config(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }

    fn execute(
        &self,
        method: &'static str,
        url: &str,
        req: RequestBuilder,
    ) -> Result<HttpResponse, TransportError> {
        let fail = |e: reqwest::Error| TransportError {
            method,
            url: url.to_string(),
            message: e.to_string(),
        };
        let resp = req.send().map_err(fail)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(fail)?;
        tracing::trace!(method, url, status, body = %body, "http response");
        Ok(HttpResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.execute("GET", url, self.client.get(url))
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportError> {
        self.execute("POST", url, self.client.post(url).json(body))
    }

    fn patch_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportError> {
        self.execute("PATCH", url, self.client.patch(url).json(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_default_config() {
        let transport = HttpTransport::from_config(&ClientConfig::default());
        assert!(transport.is_ok());
    }
}
