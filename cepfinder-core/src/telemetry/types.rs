use serde::{Deserialize, Serialize};

/// How one provider attempt ended within its race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// First success; its address was returned to the caller.
    Won,
    /// Error or timeout before any winner was known.
    Failed,
    /// Still running when the race was decided; aborted.
    Cancelled,
}

/// Provider-agnostic record of a single provider attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptTrace {
    pub provider: String,
    pub postal_code: String,
    pub outcome: AttemptOutcome,

    /// Elapsed time from race start to this attempt's end (or cancellation).
    pub latency_ms: u64,

    /// Optional error metadata, if applicable.
    pub error_kind: Option<String>,
    pub error_message: Option<String>,
}

impl AttemptTrace {
    pub fn new(provider: &str, postal_code: &str, outcome: AttemptOutcome) -> Self {
        Self {
            provider: provider.to_string(),
            postal_code: postal_code.to_string(),
            outcome,
            latency_ms: 0,
            error_kind: None,
            error_message: None,
        }
    }

    pub fn latency_ms(mut self, ms: u64) -> Self {
        self.latency_ms = ms;
        self
    }
    pub fn error_kind(mut self, kind: &str) -> Self {
        self.error_kind = Some(kind.to_string());
        self
    }
    pub fn error_message(mut self, msg: &str) -> Self {
        self.error_message = Some(msg.to_string());
        self
    }
}

/// One record per resolved (or failed) race.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RaceSummary {
    pub postal_code: String,
    pub winner: Option<String>,
    pub attempts: u32,
    pub failures: u32,
    pub cancelled: u32,
    pub elapsed_ms: u64,
    pub error_kind: Option<String>,
}

impl RaceSummary {
    pub fn new(postal_code: &str) -> Self {
        Self {
            postal_code: postal_code.to_string(),
            ..Default::default()
        }
    }
    pub fn winner_opt(mut self, v: Option<&str>) -> Self {
        self.winner = v.map(|s| s.to_string());
        self
    }
    pub fn counts(mut self, attempts: u32, failures: u32, cancelled: u32) -> Self {
        self.attempts = attempts;
        self.failures = failures;
        self.cancelled = cancelled;
        self
    }
    pub fn elapsed_ms(mut self, v: u64) -> Self {
        self.elapsed_ms = v;
        self
    }
    pub fn error_kind_opt(mut self, v: Option<&str>) -> Self {
        self.error_kind = v.map(|s| s.to_string());
        self
    }
}
