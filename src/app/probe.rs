//! Single-ID probe and outcome classification
//!
//! [`Prober::probe`] performs exactly one request per ID and never fails: every
//! problem ends up inside the returned [`ProbeResult`]. The decision logic
//! lives in [`classify`], a pure function over the transport outcome.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::{Transport, TransportResponse};
use super::models::{build_url, ProbeResult, ProbeStatus};
use crate::constants::target;
use crate::errors::TransportResult;

/// Where to probe and what the "not found" landing page looks like
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeTarget {
    /// Prefix the ID is appended to
    pub base_url: String,
    /// Final URL that marks a redirect to the homepage
    pub homepage_url: String,
}

impl Default for ProbeTarget {
    fn default() -> Self {
        Self {
            base_url: target::BASE_URL.to_string(),
            homepage_url: target::HOMEPAGE_URL.to_string(),
        }
    }
}

impl ProbeTarget {
    /// Create a target from a base URL and homepage URL
    pub fn new(base_url: impl Into<String>, homepage_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            homepage_url: homepage_url.into(),
        }
    }

    /// URL probed for `id`
    pub fn url_for(&self, id: i64) -> String {
        build_url(&self.base_url, id)
    }
}

/// Classify a transport outcome
///
/// Order matters: transport failure, then homepage redirect, then HTTP 200,
/// then everything else as an HTTP error.
pub fn classify(
    id: i64,
    url: String,
    outcome: TransportResult<TransportResponse>,
    homepage_url: &str,
) -> ProbeResult {
    match outcome {
        Err(error) => {
            let mut message = error.to_string();
            if message.is_empty() {
                message = "unknown transport error".to_string();
            }
            ProbeResult::transport_failure(id, url, message)
        }
        Ok(response) if response.final_url == homepage_url => ProbeResult::from_response(
            id,
            url,
            ProbeStatus::Redirected,
            response.final_url,
            response.status,
        ),
        Ok(response) if response.status == 200 => ProbeResult::from_response(
            id,
            url,
            ProbeStatus::Valid,
            response.final_url,
            response.status,
        ),
        Ok(response) => ProbeResult::from_response(
            id,
            url,
            ProbeStatus::Error,
            response.final_url,
            response.status,
        ),
    }
}

/// Probes IDs against a target through a shared transport
#[derive(Clone)]
pub struct Prober {
    transport: Arc<dyn Transport>,
    target: ProbeTarget,
}

impl std::fmt::Debug for Prober {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prober")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl Prober {
    /// Create a prober for `target` using `transport`
    pub fn new(transport: Arc<dyn Transport>, target: ProbeTarget) -> Self {
        Self { transport, target }
    }

    /// Probe target configuration
    pub fn target(&self) -> &ProbeTarget {
        &self.target
    }

    /// Probe one ID; a single attempt is definitive
    pub async fn probe(&self, id: i64) -> ProbeResult {
        let url = self.target.url_for(id);
        let outcome = self.transport.get(&url).await;
        let result = classify(id, url, outcome, &self.target.homepage_url);
        debug!(
            "Probed ID {}: {} (HTTP {})",
            result.id, result.status, result.http_code
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::{ScriptedOutcome, ScriptedTransport};
    use crate::errors::TransportError;

    const HOME: &str = "https://x/";

    #[test]
    fn test_classify_transport_failure() {
        let result = classify(
            8,
            "https://x/8".into(),
            Err(TransportError::Connect("connection refused".into())),
            HOME,
        );
        assert_eq!(result.status, ProbeStatus::Error);
        assert_eq!(result.http_code, 0);
        assert_eq!(result.error, "connection refused");
        assert!(result.final_url.is_empty());
    }

    #[test]
    fn test_classify_homepage_wins_over_status() {
        // Homepage check comes before the 200 check, and applies to any code
        for code in [200, 301, 404, 500] {
            let result = classify(
                1,
                "https://x/1".into(),
                Ok(TransportResponse::new(code, HOME)),
                HOME,
            );
            assert_eq!(result.status, ProbeStatus::Redirected);
            assert_eq!(result.http_code, code);
            assert_eq!(result.final_url, HOME);
        }
    }

    #[test]
    fn test_classify_valid_and_http_error() {
        let valid = classify(
            9,
            "https://x/9".into(),
            Ok(TransportResponse::new(200, "https://x/catalog/9")),
            HOME,
        );
        assert_eq!(valid.status, ProbeStatus::Valid);
        assert_eq!(valid.final_url, "https://x/catalog/9");
        assert!(valid.error.is_empty());

        let missing = classify(
            10,
            "https://x/10".into(),
            Ok(TransportResponse::new(404, "https://x/10")),
            HOME,
        );
        assert_eq!(missing.status, ProbeStatus::Error);
        assert_eq!(missing.http_code, 404);
        assert_eq!(missing.final_url, "https://x/10");
        assert!(missing.error.is_empty());
    }

    #[test]
    fn test_classify_is_pure() {
        let responses = [
            TransportResponse::new(200, "https://x/5"),
            TransportResponse::new(200, HOME),
            TransportResponse::new(503, "https://x/5"),
        ];
        for response in responses {
            let first = classify(5, "https://x/5".into(), Ok(response.clone()), HOME);
            let second = classify(5, "https://x/5".into(), Ok(response), HOME);
            assert_eq!(first, second);
        }
    }

    #[tokio::test]
    async fn test_probe_builds_url_and_classifies() {
        let transport = Arc::new(
            ScriptedTransport::new(ScriptedOutcome::status(404))
                .with_outcome("https://x/9", ScriptedOutcome::status(200)),
        );
        let prober = Prober::new(transport.clone(), ProbeTarget::new("https://x/", HOME));

        let result = prober.probe(9).await;
        assert_eq!(result.url, "https://x/9");
        assert_eq!(result.status, ProbeStatus::Valid);

        let result = prober.probe(10).await;
        assert_eq!(result.status, ProbeStatus::Error);
        assert_eq!(result.http_code, 404);

        assert_eq!(transport.call_count(), 2);
    }
}
