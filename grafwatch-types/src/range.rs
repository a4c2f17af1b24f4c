//! Query time windows.

use core::time::Duration;

/// A `[start, end]` interval in epoch seconds.
///
/// Seconds are fractional: the window is anchored at a millisecond clock
/// divided by 1000, so `end` usually carries a fractional part.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeRange {
    /// Window start, epoch seconds.
    pub start: f64,
    /// Window end, epoch seconds.
    pub end: f64,
}

impl TimeRange {
    /// Create a range from explicit bounds.
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// A window of the given length ending at `end`.
    pub fn ending_at(end: f64, window: Duration) -> Self {
        Self {
            start: end - window.as_secs_f64(),
            end,
        }
    }

    /// A window of the given length ending now.
    #[cfg(feature = "std")]
    pub fn last(window: Duration) -> Self {
        Self::ending_at(now_secs(), window)
    }

    /// Length of the window in seconds.
    pub fn window(&self) -> f64 {
        self.end - self.start
    }
}

/// Current wall-clock time in epoch seconds, at millisecond resolution.
#[cfg(feature = "std")]
pub fn now_secs() -> f64 {
    now_millis() as f64 / 1000.0
}

/// Current wall-clock time in epoch milliseconds.
#[cfg(feature = "std")]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
