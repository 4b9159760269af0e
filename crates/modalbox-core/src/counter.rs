#![forbid(unsafe_code)]

//! Open counter.

/// Number of Hidden → Showing transitions since the controller was created.
///
/// There is deliberately no reset or decrement; the only mutation is
/// [`OpenCounter::record_open`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct OpenCounter {
    opens: u64,
}

impl OpenCounter {
    /// Create a counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { opens: 0 }
    }

    /// Current count.
    #[inline]
    pub const fn get(self) -> u64 {
        self.opens
    }

    /// Record one open and return the new count.
    pub(crate) fn record_open(&mut self) -> u64 {
        self.opens = self.opens.saturating_add(1);
        self.opens
    }
}
