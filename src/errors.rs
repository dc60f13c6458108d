//! Error taxonomy for the engine (spec §7).
//!
//! `GithubDataError` gives the orchestrator and retry logic a concrete kind
//! to match on. Most call sites still thread `anyhow::Error` around (in the
//! teacher's style) and attach one of these variants with `.context(...)` or
//! `From` when they need callers to branch on *kind*, not just message text.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubDataError {
    /// Bad env var, unknown entity, dependency cycle. Fatal at the point of
    /// discovery.
    #[error("configuration error: {0}")]
    Config(String),

    /// A lookup returned 404. Downgraded to an empty result at the call
    /// site; this variant exists for the cases that want to observe it.
    #[error("not found: {0}")]
    NotFound(String),

    /// Classified rate-limit response; handled locally by the API Mediator
    /// with backoff. Surfaces only once retries are exhausted.
    #[error("rate limited: {0}")]
    RateLimit(String),

    /// Network or protocol-level failure (including rate limit exhaustion).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response shape didn't match what a converter expected.
    #[error("validation error: {0}")]
    Validation(String),

    /// Duplicate label / resource conflict during restore.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Dangling reference (missing parent, missing milestone, ...). Treated
    /// as a warning by callers: the affected child is skipped, the run
    /// continues.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// Storage read/write failure.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication failure or other unrecoverable condition. Aborts the
    /// process.
    #[error("fatal: {0}")]
    Fatal(String),
}

impl GithubDataError {
    /// Classifies an HTTP response status into the taxonomy above. Returns
    /// `None` for 2xx/3xx statuses that aren't errors.
    pub fn classify_status(status: reqwest::StatusCode, body: &str) -> Option<GithubDataError> {
        use reqwest::StatusCode as S;
        match status {
            s if s.is_success() => None,
            S::UNAUTHORIZED => Some(GithubDataError::Fatal(format!(
                "authentication failed: {body}"
            ))),
            S::NOT_FOUND => Some(GithubDataError::NotFound(body.to_string())),
            S::FORBIDDEN | S::TOO_MANY_REQUESTS => {
                Some(GithubDataError::RateLimit(body.to_string()))
            }
            S::UNPROCESSABLE_ENTITY | S::CONFLICT => Some(GithubDataError::Conflict(body.to_string())),
            s if s.is_client_error() || s.is_server_error() => {
                Some(GithubDataError::Validation(format!("{s}: {body}")))
            }
            _ => None,
        }
    }
}

/// Per-entity outcome returned by the orchestrator (spec §4.5, §7).
#[derive(Debug, Clone)]
pub struct EntityResult {
    pub entity_name: String,
    pub success: bool,
    pub error: Option<String>,
    pub count: usize,
}

impl EntityResult {
    pub fn ok(entity_name: impl Into<String>, count: usize) -> Self {
        EntityResult {
            entity_name: entity_name.into(),
            success: true,
            error: None,
            count,
        }
    }

    pub fn failed(entity_name: impl Into<String>, error: impl std::fmt::Display) -> Self {
        EntityResult {
            entity_name: entity_name.into(),
            success: false,
            error: Some(error.to_string()),
            count: 0,
        }
    }
}
