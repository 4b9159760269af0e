#![forbid(unsafe_code)]

//! Explicit visibility state for the modal.
//!
//! State machine: Hidden → Showing → Hiding → Hidden
//!
//! `Hiding` is still displayed: the `hide` class is applied and a hide timer
//! is pending. Only the timer moves `Hiding` to `Hidden`.

/// Current visibility of the modal element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Not displayed (`display: none`, or the element's initial unset display).
    #[default]
    Hidden,
    /// Displayed with the `show` class applied.
    Showing,
    /// Displayed with the `hide` class applied, waiting for the hide timer.
    Hiding,
}

impl Visibility {
    /// Whether the element currently takes part in layout.
    #[inline]
    pub fn is_displayed(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Derive the initial state from a raw `display` property value.
    ///
    /// The pre-script display value is indeterminate, so both the empty string
    /// and `"none"` count as hidden.
    pub fn from_display(display: &str) -> Self {
        if display_is_hidden(display) {
            Self::Hidden
        } else {
            Self::Showing
        }
    }

    /// Stable lowercase label, used in logs and by the web host.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Showing => "showing",
            Self::Hiding => "hiding",
        }
    }
}

impl core::fmt::Display for Visibility {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display value that hides an element.
pub const DISPLAY_NONE: &str = "none";

/// `true` when a raw display value means "not displayed".
#[inline]
pub fn display_is_hidden(display: &str) -> bool {
    let display = display.trim();
    display.is_empty() || display == DISPLAY_NONE
}
