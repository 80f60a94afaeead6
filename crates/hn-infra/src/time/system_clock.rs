use chrono::Utc;

use hn_core::ports::ClockPort;

/// Wall-clock time. Everything that compares token expiries or stamps
/// notifications goes through [`ClockPort`], so tests can pin the clock.
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
