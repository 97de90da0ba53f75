//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the reqwest
//! client used by the probe transport.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::http;
use crate::errors::ClientError;

/// Configuration for the probe HTTP client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User agent header sent with every probe
    pub user_agent: String,
    /// Overall request timeout (connect, redirects and body)
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Connection pool idle timeout
    #[serde(with = "humantime_serde")]
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections kept per host
    pub pool_max_per_host: usize,
    /// Redirect hops followed before giving up
    pub max_redirects: usize,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: http::USER_AGENT.to_string(),
            request_timeout: http::REQUEST_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: http::POOL_IDLE_TIMEOUT,
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            max_redirects: http::MAX_REDIRECTS,
            tcp_nodelay: true,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> Result<Client, ClientError> {
        let client = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .redirect(Policy::limited(self.max_redirects))
            .tcp_nodelay(self.tcp_nodelay)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_per_host)
            .build()?;
        Ok(client)
    }

    /// Validate values that reqwest would otherwise accept silently
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout.is_zero() {
            return Err("Request timeout cannot be zero".to_string());
        }
        if self.connect_timeout.is_zero() {
            return Err("Connect timeout cannot be zero".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("User agent cannot be empty".to_string());
        }
        Ok(())
    }
}
