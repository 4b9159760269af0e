#![forbid(unsafe_code)]

//! Hide timers and the host-controlled clock.
//!
//! The controller never sleeps or reads wall time. Close hands the host a
//! [`HideTimer`]; the host fires it back after `delay` elapses on its own
//! clock (a `setTimeout` on the web, a [`DeterministicClock`] in tests).

use web_time::Duration;

/// Identifier of a scheduled hide timer.
///
/// Issued by the controller in strictly increasing order, so a newer timer
/// always compares greater than an older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for TimerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "hide-timer#{}", self.0)
    }
}

/// A request to run the deferred hide action once, after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideTimer {
    pub id: TimerId,
    pub delay: Duration,
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}
