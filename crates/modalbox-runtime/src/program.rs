#![forbid(unsafe_code)]

//! The modal program: a closed message set in, commands out.
//!
//! ```text
//!   host events ──► Msg ──► ModalProgram::update ──► Cmd ──► host effects
//!                                  │
//!                        Unbound ──┴──► Bound { modal, controller }
//! ```
//!
//! Messages are processed one at a time, each to completion. The only
//! deferred work is the hide timer, which comes back as
//! [`Msg::HideTimerFired`] on the same queue.

use modalbox_core::{
    CloseOutcome, HideTimer, ModalConfig, ModalController, OpenReport, SurfaceError, TimerId,
    Visibility,
};

use crate::wiring::{self, BindError, Page, Trigger};

/// Where a container activation originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationOrigin {
    /// The container itself was struck (the backdrop).
    Container,
    /// A nested element inside the container was struck (modal content).
    Descendant,
}

/// Every message the program accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    /// The page structure is available; bind to it.
    PageReady,
    /// The open control was activated.
    OpenActivated,
    /// The close control was activated.
    CloseActivated,
    /// The modal container was activated.
    BackdropActivated { origin: ActivationOrigin },
    /// A hide timer elapsed.
    HideTimerFired(TimerId),
}

impl Msg {
    /// Short stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PageReady => "page_ready",
            Self::OpenActivated => "open_activated",
            Self::CloseActivated => "close_activated",
            Self::BackdropActivated { .. } => "backdrop_activated",
            Self::HideTimerFired(_) => "hide_timer_fired",
        }
    }
}

/// Effects the host executes after an update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cmd {
    /// No operation.
    #[default]
    None,
    /// Execute several commands in order.
    Batch(Vec<Cmd>),
    /// Emit the open report line.
    Report(OpenReport),
    /// Deliver [`Msg::HideTimerFired`] once, after the timer's delay.
    ScheduleHide(HideTimer),
    /// Drop a scheduled hide timer that has not fired yet.
    CancelHide(TimerId),
}

impl Cmd {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a batch of commands, collapsing trivial batches.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|cmd| !matches!(cmd, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => Self::Batch(cmds),
        }
    }

    /// Flatten into the executed order, dropping no-ops.
    pub fn into_flat(self) -> Vec<Self> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<Self>) {
        match self {
            Self::None => {}
            Self::Batch(cmds) => {
                for cmd in cmds {
                    cmd.flatten_into(out);
                }
            }
            other => out.push(other),
        }
    }

    fn from_close(outcome: CloseOutcome) -> Self {
        Self::batch(vec![
            outcome.cancelled.map_or(Self::None, Self::CancelHide),
            outcome.scheduled.map_or(Self::None, Self::ScheduleHide),
        ])
    }
}

/// Update failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// Binding to the page failed.
    Bind(BindError),
    /// The modal element rejected an update.
    Surface(SurfaceError),
}

impl core::fmt::Display for ProgramError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bind(err) => write!(f, "bind failed: {err}"),
            Self::Surface(err) => write!(f, "modal update failed: {err}"),
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind(err) => Some(err),
            Self::Surface(err) => Some(err),
        }
    }
}

impl From<BindError> for ProgramError {
    fn from(err: BindError) -> Self {
        Self::Bind(err)
    }
}

impl From<SurfaceError> for ProgramError {
    fn from(err: SurfaceError) -> Self {
        Self::Surface(err)
    }
}

enum Wiring<E> {
    Unbound,
    Bound {
        modal: E,
        controller: ModalController,
    },
}

/// The modal behavior bound to a host page.
pub struct ModalProgram<P: Page> {
    config: ModalConfig,
    page: P,
    wiring: Wiring<P::Element>,
    registered: Vec<Trigger>,
}

impl<P: Page> ModalProgram<P> {
    /// Create an unbound program. Nothing happens until [`Msg::PageReady`].
    pub fn new(config: ModalConfig, page: P) -> Self {
        Self {
            config,
            page,
            wiring: Wiring::Unbound,
            registered: Vec::new(),
        }
    }

    /// Whether the page bindings are registered.
    pub fn is_bound(&self) -> bool {
        matches!(self.wiring, Wiring::Bound { .. })
    }

    /// Modal visibility; `Hidden` until bound.
    pub fn visibility(&self) -> Visibility {
        match &self.wiring {
            Wiring::Unbound => Visibility::Hidden,
            Wiring::Bound { controller, .. } => controller.visibility(),
        }
    }

    /// Number of times the modal has been opened.
    pub fn open_count(&self) -> u64 {
        match &self.wiring {
            Wiring::Unbound => 0,
            Wiring::Bound { controller, .. } => controller.open_count(),
        }
    }

    /// Pending hide timer, if any.
    pub fn pending_hide(&self) -> Option<TimerId> {
        match &self.wiring {
            Wiring::Unbound => None,
            Wiring::Bound { controller, .. } => controller.pending_hide(),
        }
    }

    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Process one message to completion.
    pub fn update(&mut self, msg: Msg) -> Result<Cmd, ProgramError> {
        let _span = tracing::debug_span!("modal_update", msg = msg.name()).entered();

        let Wiring::Bound { modal, controller } = &mut self.wiring else {
            return match msg {
                Msg::PageReady => self.bind(),
                other => {
                    tracing::debug!(msg = other.name(), "message ignored: page not bound");
                    Ok(Cmd::none())
                }
            };
        };

        match msg {
            Msg::PageReady => {
                tracing::debug!("page ready ignored: already bound");
                Ok(Cmd::none())
            }
            Msg::OpenActivated => {
                let outcome = controller.open(modal)?;
                Ok(Cmd::Report(OpenReport::new(
                    self.config.report_prefix.as_str(),
                    outcome.count,
                )))
            }
            Msg::CloseActivated => Ok(Cmd::from_close(controller.close(modal)?)),
            Msg::BackdropActivated {
                origin: ActivationOrigin::Container,
            } => Ok(Cmd::from_close(controller.close(modal)?)),
            Msg::BackdropActivated {
                origin: ActivationOrigin::Descendant,
            } => {
                tracing::debug!("content activation ignored");
                Ok(Cmd::none())
            }
            Msg::HideTimerFired(id) => {
                controller.complete_hide(id, modal)?;
                Ok(Cmd::none())
            }
        }
    }

    fn bind(&mut self) -> Result<Cmd, ProgramError> {
        if let Err(err) = self.try_bind() {
            tracing::warn!(error = %err, "modal binding failed");
            return Err(err);
        }
        Ok(Cmd::none())
    }

    /// Attach before registering listeners so a failed attach leaves the page
    /// untouched.
    fn try_bind(&mut self) -> Result<(), ProgramError> {
        let elements = wiring::lookup(&self.page, &self.config.elements)?;
        let controller = ModalController::attach(self.config.clone(), &elements.modal)?;
        wiring::register(&mut self.page, &elements, &mut self.registered)?;
        self.wiring = Wiring::Bound {
            modal: elements.modal,
            controller,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessPage;
    use crate::wiring::ElementRole;
    use pretty_assertions::assert_eq;
    use web_time::Duration;

    fn bound() -> ModalProgram<HeadlessPage> {
        let mut program = ModalProgram::new(ModalConfig::default(), HeadlessPage::standard());
        assert_eq!(program.update(Msg::PageReady).unwrap(), Cmd::None);
        program
    }

    #[test]
    fn batch_collapses() {
        assert_eq!(Cmd::batch(vec![]), Cmd::None);
        assert_eq!(Cmd::batch(vec![Cmd::None, Cmd::None]), Cmd::None);
        assert_eq!(
            Cmd::batch(vec![Cmd::None, Cmd::CancelHide(TimerId::new(1))]),
            Cmd::CancelHide(TimerId::new(1))
        );
    }

    #[test]
    fn flatten_preserves_order() {
        let cmd = Cmd::Batch(vec![
            Cmd::CancelHide(TimerId::new(1)),
            Cmd::Batch(vec![Cmd::None, Cmd::CancelHide(TimerId::new(2))]),
        ]);
        assert_eq!(
            cmd.into_flat(),
            vec![
                Cmd::CancelHide(TimerId::new(1)),
                Cmd::CancelHide(TimerId::new(2))
            ]
        );
    }

    #[test]
    fn activations_before_page_ready_do_nothing() {
        let mut program = ModalProgram::new(ModalConfig::default(), HeadlessPage::standard());
        assert_eq!(program.update(Msg::OpenActivated).unwrap(), Cmd::None);
        assert_eq!(program.update(Msg::CloseActivated).unwrap(), Cmd::None);
        assert!(!program.is_bound());
        assert_eq!(program.open_count(), 0);
        assert_eq!(program.page().surface("modal").unwrap().display_value(), "");
    }

    #[test]
    fn open_reports_count() {
        let mut program = bound();
        let cmd = program.update(Msg::OpenActivated).unwrap();
        assert_eq!(cmd, Cmd::Report(OpenReport::new("📊", 1)));
        let cmd = program.update(Msg::OpenActivated).unwrap();
        assert_eq!(cmd, Cmd::Report(OpenReport::new("📊", 1)));
    }

    #[test]
    fn close_schedules_hide() {
        let mut program = bound();
        program.update(Msg::OpenActivated).unwrap();
        let cmd = program.update(Msg::CloseActivated).unwrap();
        assert_eq!(
            cmd,
            Cmd::ScheduleHide(HideTimer {
                id: TimerId::new(1),
                delay: Duration::from_millis(500)
            })
        );
        assert_eq!(program.visibility(), Visibility::Hiding);
    }

    #[test]
    fn repeated_close_cancels_then_schedules() {
        let mut program = bound();
        program.update(Msg::OpenActivated).unwrap();
        program.update(Msg::CloseActivated).unwrap();
        let cmd = program
            .update(Msg::BackdropActivated {
                origin: ActivationOrigin::Container,
            })
            .unwrap();
        assert_eq!(
            cmd.into_flat(),
            vec![
                Cmd::CancelHide(TimerId::new(1)),
                Cmd::ScheduleHide(HideTimer {
                    id: TimerId::new(2),
                    delay: Duration::from_millis(500)
                }),
            ]
        );
    }

    #[test]
    fn content_click_does_not_close() {
        let mut program = bound();
        program.update(Msg::OpenActivated).unwrap();
        let cmd = program
            .update(Msg::BackdropActivated {
                origin: ActivationOrigin::Descendant,
            })
            .unwrap();
        assert_eq!(cmd, Cmd::None);
        assert_eq!(program.visibility(), Visibility::Showing);
    }

    #[test]
    fn hide_timer_hides() {
        let mut program = bound();
        program.update(Msg::OpenActivated).unwrap();
        program.update(Msg::CloseActivated).unwrap();
        program
            .update(Msg::HideTimerFired(TimerId::new(1)))
            .unwrap();
        assert_eq!(program.visibility(), Visibility::Hidden);
        assert_eq!(
            program.page().surface("modal").unwrap().display_value(),
            "none"
        );
    }

    #[test]
    fn second_page_ready_keeps_state() {
        let mut program = bound();
        program.update(Msg::OpenActivated).unwrap();
        assert_eq!(program.update(Msg::PageReady).unwrap(), Cmd::None);
        assert_eq!(program.open_count(), 1);
        assert_eq!(program.page().listeners("modal").len(), 1);
    }

    #[test]
    fn missing_modal_fails_bind() {
        let mut page = HeadlessPage::new();
        page.insert("openModalBtn");
        page.insert("closeModalBtn");
        let mut program = ModalProgram::new(ModalConfig::default(), page);

        let err = program.update(Msg::PageReady).unwrap_err();
        assert_eq!(
            err,
            ProgramError::Bind(BindError::MissingElement {
                role: ElementRole::Modal,
                id: "modal".into()
            })
        );
        assert!(!program.is_bound());
        assert_eq!(err.to_string(), "bind failed: missing modal container element #modal");
    }
}
