/// Epoch-millisecond clock behind a seam.
///
/// Token expiry comparisons and notification timestamps read time through
/// this port so tests can pin "now" to a constant instead of sleeping.
pub trait ClockPort: Send + Sync {
    /// Current wall-clock time, milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}
