/// Span/Log attribute keys for provider attempts.
/// Keep these stable; changing them is a breaking change for dashboards.
pub const KEY_PROVIDER: &str = "provider";
pub const KEY_CEP: &str = "cep";
pub const KEY_OUTCOME: &str = "outcome";
pub const KEY_LATENCY_MS: &str = "latency_ms";
pub const KEY_WINNER: &str = "winner";

/// Error-related (if applicable)
pub const KEY_ERROR_KIND: &str = "error_kind";
