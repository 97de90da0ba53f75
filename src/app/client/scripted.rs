//! In-memory transport with canned outcomes
//!
//! Answers each URL from a lookup table, falling back to a default outcome.
//! Used by `run --dry-run` and by the pipeline tests; optional per-URL delays
//! make it possible to shuffle completion order deliberately.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{Transport, TransportResponse};
use crate::errors::{TransportError, TransportResult};

/// Canned answer for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedOutcome {
    /// Respond with a status; `final_url` of `None` means "no redirect"
    Respond {
        status: u16,
        final_url: Option<String>,
    },
    /// Fail at the transport level
    Fail(TransportError),
}

impl ScriptedOutcome {
    /// Respond with `status` at the requested URL
    pub fn status(status: u16) -> Self {
        ScriptedOutcome::Respond {
            status,
            final_url: None,
        }
    }

    /// Respond with `status` after redirecting to `final_url`
    pub fn redirect(final_url: impl Into<String>, status: u16) -> Self {
        ScriptedOutcome::Respond {
            status,
            final_url: Some(final_url.into()),
        }
    }

    /// Fail with a connection error carrying `message`
    pub fn connect_error(message: impl Into<String>) -> Self {
        ScriptedOutcome::Fail(TransportError::Connect(message.into()))
    }
}

#[derive(Debug, Clone)]
struct Script {
    outcome: ScriptedOutcome,
    delay: Duration,
}

/// Transport answering from a table instead of the network
#[derive(Debug)]
pub struct ScriptedTransport {
    scripts: HashMap<String, Script>,
    fallback: ScriptedOutcome,
    fallback_delay: Duration,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    /// Transport that answers every unknown URL with `fallback`
    pub fn new(fallback: ScriptedOutcome) -> Self {
        Self {
            scripts: HashMap::new(),
            fallback,
            fallback_delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Transport that redirects every URL to `homepage` with HTTP 200
    pub fn always_homepage(homepage: impl Into<String>) -> Self {
        Self::new(ScriptedOutcome::redirect(homepage, 200))
    }

    /// Script the outcome for one URL
    pub fn with_outcome(mut self, url: impl Into<String>, outcome: ScriptedOutcome) -> Self {
        self.scripts.insert(
            url.into(),
            Script {
                outcome,
                delay: Duration::ZERO,
            },
        );
        self
    }

    /// Script the outcome for one URL, delivered after `delay`
    pub fn with_delayed_outcome(
        mut self,
        url: impl Into<String>,
        outcome: ScriptedOutcome,
        delay: Duration,
    ) -> Self {
        self.scripts.insert(url.into(), Script { outcome, delay });
        self
    }

    /// Delay applied to fallback answers
    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }

    /// Number of requests served so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URLs requested so far, in arrival order
    pub fn requested_urls(&self) -> Vec<String> {
        match self.requested.lock() {
            Ok(urls) => urls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> TransportResult<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.requested.lock() {
            Ok(mut urls) => urls.push(url.to_string()),
            Err(poisoned) => poisoned.into_inner().push(url.to_string()),
        }

        let (outcome, delay) = match self.scripts.get(url) {
            Some(script) => (script.outcome.clone(), script.delay),
            None => (self.fallback.clone(), self.fallback_delay),
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match outcome {
            ScriptedOutcome::Respond { status, final_url } => Ok(TransportResponse {
                status,
                final_url: final_url.unwrap_or_else(|| url.to_string()),
            }),
            ScriptedOutcome::Fail(error) => Err(error),
        }
    }
}
