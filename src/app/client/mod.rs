//! HTTP transport layer for probes
//!
//! The probe talks to the network only through the [`Transport`] trait, so the
//! pipeline can run against the real reqwest client or against a scripted
//! in-memory transport.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: reqwest-backed transport
//! - `scripted`: in-memory transport with per-URL canned outcomes

use async_trait::async_trait;

use crate::errors::TransportResult;

pub mod config;
pub mod http;
pub mod scripted;

pub use config::ClientConfig;
pub use http::HttpTransport;
pub use scripted::{ScriptedOutcome, ScriptedTransport};

/// What a probe needs to know about a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Status code of the final response in the redirect chain
    pub status: u16,
    /// URL of the final response in the redirect chain
    pub final_url: String,
}

impl TransportResponse {
    /// Create a response description
    pub fn new(status: u16, final_url: impl Into<String>) -> Self {
        Self {
            status,
            final_url: final_url.into(),
        }
    }
}

/// A single-shot GET with redirects followed
///
/// Implementations must not retry, and must release the connection (drain
/// the body) before returning.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET for `url` and report the final status and URL
    async fn get(&self, url: &str) -> TransportResult<TransportResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_response_new() {
        let response = TransportResponse::new(200, "https://x/9");
        assert_eq!(response.status, 200);
        assert_eq!(response.final_url, "https://x/9");
    }
}
