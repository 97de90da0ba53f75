//! reqwest-backed probe transport
//!
//! One GET per call, redirects followed by the client's redirect policy, no
//! retries. The body is always read to the end so the connection goes back to
//! the pool.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::config::ClientConfig;
use super::{Transport, TransportResponse};
use crate::errors::{error_chain, ClientError, TransportError, TransportResult};

/// Probe transport over a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport from client configuration
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if reqwest rejects the configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = config.build_http_client()?;
        debug!(
            "Created HTTP transport (timeout {:?}, max redirects {})",
            config.request_timeout, config.max_redirects
        );
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> TransportResult<TransportResponse> {
        let request = self
            .client
            .get(url)
            .build()
            .map_err(|e| TransportError::Request(error_chain(&e)))?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        // Drain the body; the classification only depends on status and URL
        if let Err(e) = response.bytes().await {
            debug!("Failed to drain response body for {}: {}", url, e);
        }

        Ok(TransportResponse { status, final_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new(&ClientConfig::default());
        assert!(transport.is_ok());
    }

    #[tokio::test]
    async fn test_malformed_url_is_request_error() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        let result = transport.get("not a url/42").await;
        match result {
            Err(TransportError::Request(message)) => assert!(!message.is_empty()),
            other => panic!("expected request error, got {:?}", other),
        }
    }
}
