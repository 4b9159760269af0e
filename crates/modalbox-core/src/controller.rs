#![forbid(unsafe_code)]

//! Modal visibility controller.
//!
//! Owns the explicit [`Visibility`] state, the [`OpenCounter`], and the single
//! pending hide timer. Every transition is validated against the current
//! state; the element's style is written but never read back after
//! [`ModalController::attach`].
//!
//! # Example
//!
//! ```
//! use modalbox_core::{MemorySurface, ModalConfig, ModalController, Visibility};
//!
//! let mut surface = MemorySurface::new();
//! let mut controller = ModalController::attach(ModalConfig::default(), &surface).unwrap();
//!
//! let opened = controller.open(&mut surface).unwrap();
//! assert_eq!(opened.count, 1);
//!
//! let closed = controller.close(&mut surface).unwrap();
//! let timer = closed.scheduled.unwrap();
//! assert_eq!(controller.visibility(), Visibility::Hiding);
//!
//! // ...the host fires the timer after `timer.delay`.
//! assert!(controller.complete_hide(timer.id, &mut surface).unwrap());
//! assert_eq!(surface.display_value(), "none");
//! ```
//!
//! # Invariants
//!
//! - A hide timer is pending if and only if the state is `Hiding`.
//! - The open count increases by exactly one per `Hidden → Showing`
//!   transition and never decreases.
//! - After any Open or Close, at most one of the two marker classes is set.
//!
//! # Failure Modes
//!
//! - Surface errors abort the transition before the state changes; the element
//!   may have been partially updated.

use crate::config::{ClosePolicy, ModalConfig};
use crate::counter::OpenCounter;
use crate::surface::{ModalSurface, SurfaceError};
use crate::timer::{HideTimer, TimerId};
use crate::visibility::{DISPLAY_NONE, Visibility};

/// Result of [`ModalController::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOutcome {
    /// Open count after the call, whether or not this call opened the modal.
    pub count: u64,
    /// `true` if this call moved the modal from `Hidden` to `Showing`.
    pub opened: bool,
}

/// Result of [`ModalController::close`]. Close always succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloseOutcome {
    /// Hide timer the host must fire after its delay.
    pub scheduled: Option<HideTimer>,
    /// Previously pending timer the host should cancel.
    pub cancelled: Option<TimerId>,
}

/// Controller for a single modal element.
#[derive(Debug, Clone)]
pub struct ModalController {
    config: ModalConfig,
    visibility: Visibility,
    counter: OpenCounter,
    pending_hide: Option<TimerId>,
    next_timer: u64,
}

impl ModalController {
    /// Create a controller whose initial state is read from `surface`.
    ///
    /// An unset or `none` display is `Hidden`; anything else is `Showing`.
    pub fn attach<S: ModalSurface + ?Sized>(
        config: ModalConfig,
        surface: &S,
    ) -> Result<Self, SurfaceError> {
        let raw = surface.display()?;
        let visibility = Visibility::from_display(&raw);
        tracing::debug!(display = %raw, visibility = %visibility, "modal attached");
        Ok(Self {
            config,
            visibility,
            counter: OpenCounter::new(),
            pending_hide: None,
            next_timer: 0,
        })
    }

    /// Current visibility state.
    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Number of times the modal has been opened.
    #[inline]
    pub fn open_count(&self) -> u64 {
        self.counter.get()
    }

    /// Id of the pending hide timer, if any.
    #[inline]
    pub fn pending_hide(&self) -> Option<TimerId> {
        self.pending_hide
    }

    /// Configuration this controller was built with.
    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    /// Show the modal if it is hidden.
    ///
    /// While the modal is displayed (`Showing`, or `Hiding` before its timer
    /// fires) this is a no-op that still reports the current count.
    pub fn open<S: ModalSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<OpenOutcome, SurfaceError> {
        if self.visibility.is_displayed() {
            tracing::debug!(visibility = %self.visibility, "open ignored: modal displayed");
            return Ok(OpenOutcome {
                count: self.counter.get(),
                opened: false,
            });
        }

        surface.set_display(&self.config.visible_display)?;
        surface.remove_class(&self.config.classes.hide)?;
        surface.add_class(&self.config.classes.show)?;

        self.visibility = Visibility::Showing;
        let count = self.counter.record_open();
        tracing::debug!(count, "modal opened");
        Ok(OpenOutcome {
            count,
            opened: true,
        })
    }

    /// Start hiding the modal.
    ///
    /// The marker classes are swapped immediately regardless of state. The
    /// modal leaves layout only when the returned timer is fired back through
    /// [`complete_hide`](Self::complete_hide).
    pub fn close<S: ModalSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<CloseOutcome, SurfaceError> {
        surface.remove_class(&self.config.classes.show)?;
        surface.add_class(&self.config.classes.hide)?;

        let outcome = match (self.visibility, self.config.close_policy) {
            (Visibility::Hidden, _) => CloseOutcome::default(),
            (Visibility::Showing, _) => CloseOutcome {
                scheduled: Some(self.arm_hide_timer()),
                cancelled: None,
            },
            (Visibility::Hiding, ClosePolicy::Restart) => {
                let cancelled = self.pending_hide.take();
                CloseOutcome {
                    scheduled: Some(self.arm_hide_timer()),
                    cancelled,
                }
            }
            (Visibility::Hiding, ClosePolicy::KeepPending) => CloseOutcome::default(),
        };

        if self.visibility == Visibility::Showing {
            self.visibility = Visibility::Hiding;
        }
        tracing::debug!(
            visibility = %self.visibility,
            scheduled = ?outcome.scheduled.map(|t| t.id),
            cancelled = ?outcome.cancelled,
            "modal closing"
        );
        debug_assert_eq!(
            self.pending_hide.is_some(),
            self.visibility == Visibility::Hiding
        );
        Ok(outcome)
    }

    /// Run the deferred hide action for timer `id`.
    ///
    /// Returns `false` and leaves the element untouched when `id` is not the
    /// pending timer (it was cancelled or replaced).
    pub fn complete_hide<S: ModalSurface + ?Sized>(
        &mut self,
        id: TimerId,
        surface: &mut S,
    ) -> Result<bool, SurfaceError> {
        if self.pending_hide != Some(id) {
            tracing::debug!(timer = %id, pending = ?self.pending_hide, "stale hide timer ignored");
            return Ok(false);
        }

        surface.set_display(DISPLAY_NONE)?;
        self.pending_hide = None;
        self.visibility = Visibility::Hidden;
        tracing::debug!(timer = %id, "modal hidden");
        Ok(true)
    }

    fn arm_hide_timer(&mut self) -> HideTimer {
        self.next_timer += 1;
        let id = TimerId::new(self.next_timer);
        self.pending_hide = Some(id);
        HideTimer {
            id,
            delay: self.config.hide_delay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use pretty_assertions::assert_eq;
    use web_time::Duration;

    fn setup() -> (ModalController, MemorySurface) {
        let surface = MemorySurface::new();
        let controller = ModalController::attach(ModalConfig::default(), &surface).unwrap();
        (controller, surface)
    }

    #[test]
    fn unset_display_attaches_hidden() {
        let (controller, _) = setup();
        assert_eq!(controller.visibility(), Visibility::Hidden);
        assert_eq!(controller.open_count(), 0);
    }

    #[test]
    fn visible_display_attaches_showing() {
        let surface = MemorySurface::with_display("block");
        let controller = ModalController::attach(ModalConfig::default(), &surface).unwrap();
        assert_eq!(controller.visibility(), Visibility::Showing);
    }

    #[test]
    fn open_shows_and_counts() {
        let (mut controller, mut surface) = setup();
        surface.add_class("hide").unwrap();

        let outcome = controller.open(&mut surface).unwrap();
        assert_eq!(
            outcome,
            OpenOutcome {
                count: 1,
                opened: true
            }
        );
        assert_eq!(surface.display_value(), "flex");
        assert_eq!(surface.classes(), ["show"]);
        assert_eq!(controller.visibility(), Visibility::Showing);
    }

    #[test]
    fn second_open_is_idempotent() {
        let (mut controller, mut surface) = setup();
        controller.open(&mut surface).unwrap();
        let before = surface.clone();

        let outcome = controller.open(&mut surface).unwrap();
        assert_eq!(
            outcome,
            OpenOutcome {
                count: 1,
                opened: false
            }
        );
        assert_eq!(surface, before);
    }

    #[test]
    fn close_swaps_classes_and_defers_display() {
        let (mut controller, mut surface) = setup();
        controller.open(&mut surface).unwrap();

        let outcome = controller.close(&mut surface).unwrap();
        let timer = outcome.scheduled.expect("timer scheduled");
        assert_eq!(timer.delay, Duration::from_millis(500));
        assert_eq!(outcome.cancelled, None);
        assert_eq!(surface.classes(), ["hide"]);
        assert_eq!(surface.display_value(), "flex");
        assert_eq!(controller.visibility(), Visibility::Hiding);

        assert!(controller.complete_hide(timer.id, &mut surface).unwrap());
        assert_eq!(surface.display_value(), "none");
        assert_eq!(controller.visibility(), Visibility::Hidden);
        assert_eq!(controller.pending_hide(), None);
    }

    #[test]
    fn close_while_hidden_only_swaps_classes() {
        let (mut controller, mut surface) = setup();
        surface.add_class("show").unwrap();

        let outcome = controller.close(&mut surface).unwrap();
        assert_eq!(outcome, CloseOutcome::default());
        assert_eq!(surface.classes(), ["hide"]);
        assert_eq!(controller.visibility(), Visibility::Hidden);
    }

    #[test]
    fn restart_policy_replaces_pending_timer() {
        let (mut controller, mut surface) = setup();
        controller.open(&mut surface).unwrap();
        let first = controller.close(&mut surface).unwrap().scheduled.unwrap();
        let second = controller.close(&mut surface).unwrap();

        assert_eq!(second.cancelled, Some(first.id));
        let second = second.scheduled.unwrap();
        assert!(second.id > first.id);
        assert_eq!(controller.pending_hide(), Some(second.id));

        assert!(!controller.complete_hide(first.id, &mut surface).unwrap());
        assert_eq!(surface.display_value(), "flex");
        assert!(controller.complete_hide(second.id, &mut surface).unwrap());
        assert_eq!(surface.display_value(), "none");
    }

    #[test]
    fn keep_pending_policy_keeps_first_timer() {
        let config = ModalConfig {
            close_policy: ClosePolicy::KeepPending,
            ..ModalConfig::default()
        };
        let mut surface = MemorySurface::new();
        let mut controller = ModalController::attach(config, &surface).unwrap();
        controller.open(&mut surface).unwrap();

        let first = controller.close(&mut surface).unwrap().scheduled.unwrap();
        let second = controller.close(&mut surface).unwrap();
        assert_eq!(second, CloseOutcome::default());
        assert_eq!(controller.pending_hide(), Some(first.id));
    }

    #[test]
    fn open_while_hiding_is_a_no_op() {
        let (mut controller, mut surface) = setup();
        controller.open(&mut surface).unwrap();
        controller.close(&mut surface).unwrap();

        let outcome = controller.open(&mut surface).unwrap();
        assert!(!outcome.opened);
        assert_eq!(outcome.count, 1);
        assert_eq!(surface.classes(), ["hide"]);
        assert_eq!(controller.visibility(), Visibility::Hiding);
    }

    #[test]
    fn reopen_after_hide_counts_again() {
        let (mut controller, mut surface) = setup();
        controller.open(&mut surface).unwrap();
        let timer = controller.close(&mut surface).unwrap().scheduled.unwrap();
        controller.complete_hide(timer.id, &mut surface).unwrap();

        let outcome = controller.open(&mut surface).unwrap();
        assert_eq!(outcome.count, 2);
        assert_eq!(surface.classes(), ["show"]);
        assert_eq!(surface.display_value(), "flex");
    }

    #[test]
    fn custom_classes_and_display() {
        let mut config = ModalConfig::default();
        config.classes.show = "is-open".into();
        config.classes.hide = "is-closing".into();
        config.visible_display = "grid".into();
        let mut surface = MemorySurface::new();
        let mut controller = ModalController::attach(config, &surface).unwrap();

        controller.open(&mut surface).unwrap();
        assert_eq!(surface.display_value(), "grid");
        assert_eq!(surface.classes(), ["is-open"]);
        controller.close(&mut surface).unwrap();
        assert_eq!(surface.classes(), ["is-closing"]);
    }

    struct FailingSurface;

    impl ModalSurface for FailingSurface {
        fn display(&self) -> Result<String, SurfaceError> {
            Ok(String::new())
        }
        fn set_display(&mut self, _: &str) -> Result<(), SurfaceError> {
            Err(SurfaceError::Host("detached".into()))
        }
        fn add_class(&mut self, _: &str) -> Result<(), SurfaceError> {
            Ok(())
        }
        fn remove_class(&mut self, _: &str) -> Result<(), SurfaceError> {
            Ok(())
        }
        fn has_class(&self, _: &str) -> Result<bool, SurfaceError> {
            Ok(false)
        }
    }

    #[test]
    fn surface_error_leaves_state_unchanged() {
        let mut surface = FailingSurface;
        let mut controller = ModalController::attach(ModalConfig::default(), &surface).unwrap();
        let err = controller.open(&mut surface).unwrap_err();
        assert_eq!(err, SurfaceError::Host("detached".into()));
        assert_eq!(controller.visibility(), Visibility::Hidden);
        assert_eq!(controller.open_count(), 0);
    }
}
