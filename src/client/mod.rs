/// HTTP client for the statistics endpoint.
///
/// Issues exactly one `GET {base_url}{path}[?filters]` per refresh cycle
/// using the synchronous `ureq` client. The call blocks the caller until
/// the round-trip completes; there are no automatic retries.
///
/// Every failure is reported as a [`StatsFetchError`]:
///
/// - **NetworkFailure**: the request could not be sent or completed.
/// - **HttpError**: non-2xx status; the message comes from the JSON error
///   body when it has one, otherwise `HTTP error {status}`.
/// - **DecodeFailure**: the 2xx body was not a valid statistics payload.
use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::config::schema::EndpointConfig;
use crate::filters::{FilterStore, query};
use crate::stats::StatsResponse;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a refresh cycle could not obtain statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsFetchError {
    NetworkFailure(String),
    HttpError { status: u16, message: String },
    DecodeFailure(String),
}

impl StatsFetchError {
    /// Build an [`HttpError`](Self::HttpError) from a non-2xx response body.
    ///
    /// Looks for a `message` (or `error`) string in a JSON body. Falls back
    /// to `HTTP error {status}` when the body is not JSON or carries no
    /// usable message.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error {status}"));
        Self::HttpError { status, message }
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for StatsFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkFailure(reason) => write!(f, "network failure: {reason}"),
            Self::HttpError { message, .. } => write!(f, "{message}"),
            Self::DecodeFailure(reason) => write!(f, "malformed statistics response: {reason}"),
        }
    }
}

impl std::error::Error for StatsFetchError {}

/// Error body returned by the backend on failure statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Anything that can produce statistics for a filter set.
///
/// The controller depends on this seam rather than on HTTP, so refresh
/// cycles can be driven by canned responses in tests.
pub trait StatsSource {
    fn fetch_stats(&self, filters: &FilterStore) -> Result<StatsResponse, StatsFetchError>;
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Synchronous statistics client bound to one endpoint.
#[derive(Debug, Clone)]
pub struct StatsClient {
    endpoint: String,
    timeout: Duration,
}

impl StatsClient {
    /// Build a client from the resolved `[endpoint]` config.
    pub fn from_config(config: &EndpointConfig) -> Self {
        let base = config.base_url.trim_end_matches('/');
        let path = if config.path.starts_with('/') {
            config.path.clone()
        } else {
            format!("/{}", config.path)
        };
        Self {
            endpoint: format!("{base}{path}"),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Full endpoint URL without a query string.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// URL requested for the given filters.
    pub fn request_url(&self, filters: &FilterStore) -> String {
        query::with_query(&self.endpoint, filters)
    }

    /// Check whether the endpoint answers at all (any HTTP status).
    ///
    /// Uses a short timeout so `loandash health` never stalls.
    pub fn is_reachable(&self) -> bool {
        let timeout = self.timeout.min(Duration::from_secs(5));
        match ureq::get(&self.endpoint).timeout(timeout).call() {
            Ok(_) | Err(ureq::Error::Status(..)) => true,
            Err(ureq::Error::Transport(_)) => false,
        }
    }
}

impl StatsSource for StatsClient {
    fn fetch_stats(&self, filters: &FilterStore) -> Result<StatsResponse, StatsFetchError> {
        let url = self.request_url(filters);

        match ureq::get(&url).timeout(self.timeout).call() {
            Ok(resp) => resp
                .into_json::<StatsResponse>()
                .map_err(|e| StatsFetchError::DecodeFailure(e.to_string())),
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(StatsFetchError::from_error_body(status, &body))
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(StatsFetchError::NetworkFailure(transport.to_string()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
