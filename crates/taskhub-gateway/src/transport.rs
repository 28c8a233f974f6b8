//! Transport to the REST backend.
//!
//! The trait exists so services can be tested against a mock; the reqwest
//! implementation is the only production transport.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use taskhub_core::error::{Result, TaskhubError};

/// Header conveying the caller's username, forwarded verbatim.
pub const USER_HEADER: &str = "userId";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestTransport: Send + Sync {
    /// Send a request to the REST backend as `username`. Returns the raw
    /// response body when the status matches `expected`; any other status
    /// becomes the typed error the REST backend signaled.
    async fn send(
        &self,
        method: &str,
        route: &str,
        body: Option<Value>,
        username: &str,
        expected: u16,
    ) -> Result<Vec<u8>>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

/// Map an unexpected upstream status back into the typed taxonomy so the
/// gateway re-signals what the REST backend meant.
fn error_from_status(status: u16, body: String) -> TaskhubError {
    match status {
        400 => TaskhubError::Validation(body),
        401 => TaskhubError::Authentication(body),
        403 => TaskhubError::Authorization(body),
        404 => TaskhubError::NotFound(body),
        409 => TaskhubError::Conflict(body),
        416 => TaskhubError::OutOfRange(body),
        _ => TaskhubError::Internal(anyhow::anyhow!(
            "unexpected upstream status {status}: {body}"
        )),
    }
}

#[async_trait]
impl RestTransport for HttpTransport {
    async fn send(
        &self,
        method: &str,
        route: &str,
        body: Option<Value>,
        username: &str,
        expected: u16,
    ) -> Result<Vec<u8>> {
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|e| TaskhubError::Internal(anyhow::anyhow!(e)))?;
        let url = format!("{}{}", self.base_url, route);

        let mut request = self.client.request(method, &url).header(USER_HEADER, username);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TaskhubError::Internal(anyhow::anyhow!(e)))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TaskhubError::Internal(anyhow::anyhow!(e)))?;

        if status != expected {
            let body_text = String::from_utf8_lossy(&bytes).into_owned();
            tracing::warn!(%url, status, "unexpected status from REST backend");
            return Err(error_from_status(status, body_text));
        }

        Ok(bytes.to_vec())
    }
}
