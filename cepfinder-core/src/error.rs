use serde::Serialize;
use thiserror::Error;

/// One provider's reason for dropping out of a race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub reason: String,
}

/// Core error type for cepfinder.
/// Internally, modules can use `anyhow::Result<T>` for convenience,
/// but public boundaries should expose `CoreResult<T>` with this error.
#[derive(Debug, Error)]
pub enum CepError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("provider {provider} timed out after {after_ms}ms")]
    Timeout { provider: String, after_ms: u64 },

    #[error("provider unavailable: {provider}")]
    ProviderUnavailable { provider: String },

    #[error("upstream error from {provider}: {code} {message}")]
    ProviderError {
        provider: String,
        code: String,
        message: String,
    },

    #[error("postal code not found by {provider}")]
    NotFound { provider: String },

    #[error("all providers failed ({} attempts)", .failures.len())]
    AllProvidersFailed { failures: Vec<ProviderFailure> },

    #[error("no provider answered within {after_ms}ms")]
    DeadlineExceeded {
        after_ms: u64,
        /// Providers that had already dropped out when the deadline hit.
        failures: Vec<ProviderFailure>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CepError {
    /// Short stable label, used for telemetry `error_kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Timeout { .. } => "timeout",
            Self::ProviderUnavailable { .. } => "unavailable",
            Self::ProviderError { .. } => "provider_error",
            Self::NotFound { .. } => "not_found",
            Self::AllProvidersFailed { .. } => "all_failed",
            Self::DeadlineExceeded { .. } => "deadline",
            Self::Io(_) => "io",
            Self::Other(_) => "other",
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CepError>;
