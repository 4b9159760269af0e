#![forbid(unsafe_code)]

//! The diagnostic line emitted once per open activation.

/// Report of the open count after an open activation.
///
/// Formats as `"<prefix> Modal has been opened N time(s)."`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenReport {
    prefix: String,
    count: u64,
}

impl OpenReport {
    /// Build a report for `count` with the given prefix.
    pub fn new(prefix: impl Into<String>, count: u64) -> Self {
        Self {
            prefix: prefix.into(),
            count,
        }
    }

    /// The count carried by this report.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Emit the report as a structured `info` event on `modalbox::report`.
    pub fn emit(&self) {
        tracing::info!(target: "modalbox::report", count = self.count, "{self}");
    }
}

impl core::fmt::Display for OpenReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if !self.prefix.is_empty() {
            write!(f, "{} ", self.prefix)?;
        }
        write!(f, "Modal has been opened {} time(s).", self.count)
    }
}

/// Emit the open report for `count`. Observability only.
pub fn report_count(prefix: &str, count: u64) {
    OpenReport::new(prefix, count).emit();
}
