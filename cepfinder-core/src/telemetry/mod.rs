//! Telemetry hooks for race attempts.
//! By default, no telemetry is emitted unless a sink is installed via `set_telemetry_sink`.
//!
//! Losing and cancelled attempts are reported here as well, so slow providers stay
//! visible even though they never influence which address is returned.

pub mod keys;
pub mod types;
#[cfg(test)]
pub mod test_span;

pub use keys::*;
pub use types::*;

use std::sync::Arc;

use once_cell::sync::OnceCell;

/// Implement this to receive telemetry events.
///
/// Requirements:
/// - Implementations must be thread-safe (`Send + Sync`) and `'static`.
/// - `record` **may** be called from any thread; implementations should avoid panicking.
/// - Keep overhead minimal; this is on the request path.
pub trait TelemetrySink: Send + Sync + 'static {
    fn record(&self, trace: crate::telemetry::AttemptTrace);

    fn record_race(&self, _summary: crate::telemetry::RaceSummary) {}
}

static TELEMETRY_SINK: OnceCell<Arc<dyn TelemetrySink>> = OnceCell::new();

// In tests, gate emission to only the calling test thread to avoid cross-test interference.
#[cfg(test)]
thread_local! {
    static TEST_CAPTURE: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

/// Install a global telemetry sink. Returns `false` if a sink is already installed.
///
/// This is a write-once global for the process lifetime (backed by `OnceCell`).
pub fn set_telemetry_sink(sink: Arc<dyn TelemetrySink>) -> bool {
    TELEMETRY_SINK.set(sink).is_ok()
}

/// Emit an attempt record if a sink is installed.
///
/// In tests, emission is suppressed unless explicitly enabled via `test_set_capture_enabled`.
#[inline]
pub(crate) fn emit(trace: crate::telemetry::AttemptTrace) {
    #[cfg(test)]
    {
        if !TEST_CAPTURE.with(|c| c.get()) {
            return;
        }
    }
    if let Some(sink) = TELEMETRY_SINK.get() {
        sink.record(trace);
    }
}

#[inline]
pub(crate) fn emit_race(summary: crate::telemetry::RaceSummary) {
    #[cfg(test)]
    {
        if !TEST_CAPTURE.with(|c| c.get()) {
            return;
        }
    }
    if let Some(sink) = TELEMETRY_SINK.get() {
        sink.record_race(summary);
    }
}

#[cfg(test)]
/// Test-only helper: enable or disable capture for the current test thread.
pub fn test_set_capture_enabled(enabled: bool) {
    TEST_CAPTURE.with(|c| c.set(enabled));
}
