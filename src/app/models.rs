//! Data models for probe results
//!
//! A [`ProbeResult`] is produced once per ID by the probe, moved through the
//! worker pool and consumed by the result sink. It is never mutated after
//! construction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// HTTP 200 that did not land on the homepage
    Valid,
    /// Redirect chain ended on the homepage
    Redirected,
    /// Client-side (HTML meta refresh) redirect to the homepage.
    ///
    /// Reserved: detecting it requires body parsing, which the probe does not
    /// do, so no result carries this status today.
    MetaRedirected,
    /// Transport failure or any other HTTP status
    Error,
}

impl ProbeStatus {
    /// Status string as written to the CSV output
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Valid => "valid",
            ProbeStatus::Redirected => "redirected",
            ProbeStatus::MetaRedirected => "meta_redirected",
            ProbeStatus::Error => "error",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of probing one ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Probed ID
    pub id: i64,
    /// URL requested (`base_url + id`)
    pub url: String,
    /// Classification
    pub status: ProbeStatus,
    /// URL after redirects; empty when no response was received
    pub final_url: String,
    /// HTTP status code; 0 when no response was received
    pub http_code: u16,
    /// Transport failure description; empty otherwise
    pub error: String,
}

impl ProbeResult {
    /// Result for a request that never produced a response
    pub fn transport_failure(id: i64, url: String, error: impl Into<String>) -> Self {
        Self {
            id,
            url,
            status: ProbeStatus::Error,
            final_url: String::new(),
            http_code: 0,
            error: error.into(),
        }
    }

    /// Result for a request that produced a response
    pub fn from_response(
        id: i64,
        url: String,
        status: ProbeStatus,
        final_url: String,
        http_code: u16,
    ) -> Self {
        Self {
            id,
            url,
            status,
            final_url,
            http_code,
            error: String::new(),
        }
    }

    /// Whether this result belongs in the filtered CSV output
    pub fn is_valid(&self) -> bool {
        self.status == ProbeStatus::Valid
    }

    /// Whether the failure happened below HTTP (no response received)
    pub fn is_transport_failure(&self) -> bool {
        !self.error.is_empty()
    }

    /// Log message for this result, without the timestamp prefix
    pub fn log_message(&self) -> String {
        match self.status {
            ProbeStatus::Valid => format!("ID {}: VALID catalog found!", self.id),
            ProbeStatus::Redirected => format!(
                "ID {}: HTTP redirected to homepage (HTTP: {})",
                self.id, self.http_code
            ),
            ProbeStatus::MetaRedirected => format!(
                "ID {}: HTML meta redirected to homepage (HTTP: {})",
                self.id, self.http_code
            ),
            ProbeStatus::Error if self.is_transport_failure() => {
                format!("ID {}: Error - {}", self.id, self.error)
            }
            ProbeStatus::Error => format!("ID {}: HTTP {} error", self.id, self.http_code),
        }
    }

    /// CSV row matching the output header
    pub fn csv_record(&self) -> [String; 5] {
        [
            self.id.to_string(),
            self.url.clone(),
            self.status.to_string(),
            self.final_url.clone(),
            self.http_code.to_string(),
        ]
    }
}

/// Build the probe URL for an ID by plain concatenation
pub fn build_url(base_url: &str, id: i64) -> String {
    format!("{}{}", base_url, id)
}
