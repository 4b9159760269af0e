#![forbid(unsafe_code)]

//! Command execution against host timers and output.
//!
//! Free of `web-sys`, so the timer bookkeeping is testable natively.

use std::collections::HashMap;

use modalbox_core::{HideTimer, TimerId};
use modalbox_runtime::{Cmd, Msg};

/// Timer and console primitives of a host.
pub trait EffectBackend {
    /// Write one report line.
    fn log(&mut self, line: &str);

    /// Arrange for `timer` to fire after its delay. Returns the host handle.
    fn set_timeout(&mut self, timer: &HideTimer) -> Result<i32, String>;

    /// Cancel a handle returned by [`set_timeout`](Self::set_timeout).
    fn clear_timeout(&mut self, handle: i32);
}

/// Host timer handles for scheduled hide timers.
#[derive(Debug, Default)]
pub struct EffectRunner {
    timers: HashMap<TimerId, i32>,
    last_error: Option<String>,
}

impl EffectRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget a timer the host has fired.
    pub fn timer_fired(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }

    /// Number of timers scheduled with the host.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Take the most recent execution failure.
    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    /// Execute `cmd` and return the messages the host must deliver next.
    ///
    /// A hide timer the host refuses to schedule fires immediately, so the
    /// modal cannot stay in `Hiding` with no timer behind it.
    pub fn execute<B: EffectBackend>(&mut self, backend: &mut B, cmd: Cmd) -> Vec<Msg> {
        let mut followups = Vec::new();
        for cmd in cmd.into_flat() {
            match cmd {
                Cmd::None | Cmd::Batch(_) => {}
                Cmd::Report(report) => {
                    report.emit();
                    backend.log(&report.to_string());
                }
                Cmd::ScheduleHide(timer) => match backend.set_timeout(&timer) {
                    Ok(handle) => {
                        self.timers.insert(timer.id, handle);
                    }
                    Err(err) => {
                        tracing::warn!(timer = %timer.id, error = %err, "setTimeout failed");
                        self.last_error = Some(format!("{} not scheduled: {err}", timer.id));
                        followups.push(Msg::HideTimerFired(timer.id));
                    }
                },
                Cmd::CancelHide(id) => {
                    if let Some(handle) = self.timers.remove(&id) {
                        backend.clear_timeout(handle);
                    }
                }
            }
        }
        followups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modalbox_core::{ModalConfig, OpenReport, Visibility};
    use modalbox_runtime::{HeadlessPage, ModalProgram};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingBackend {
        lines: Vec<String>,
        cleared: Vec<i32>,
        next_handle: i32,
        refuse: bool,
    }

    impl EffectBackend for RecordingBackend {
        fn log(&mut self, line: &str) {
            self.lines.push(line.to_owned());
        }

        fn set_timeout(&mut self, _: &HideTimer) -> Result<i32, String> {
            if self.refuse {
                return Err("quota exceeded".into());
            }
            self.next_handle += 1;
            Ok(self.next_handle)
        }

        fn clear_timeout(&mut self, handle: i32) {
            self.cleared.push(handle);
        }
    }

    fn timer(id: u64) -> HideTimer {
        HideTimer {
            id: TimerId::new(id),
            delay: Duration::from_millis(500),
        }
    }

    #[test]
    fn report_is_logged() {
        let mut backend = RecordingBackend::default();
        let mut runner = EffectRunner::new();
        let followups = runner.execute(&mut backend, Cmd::Report(OpenReport::new("📊", 3)));
        assert!(followups.is_empty());
        assert_eq!(backend.lines, ["📊 Modal has been opened 3 time(s)."]);
    }

    #[test]
    fn cancel_clears_the_host_handle() {
        let mut backend = RecordingBackend::default();
        let mut runner = EffectRunner::new();
        runner.execute(&mut backend, Cmd::ScheduleHide(timer(1)));
        assert_eq!(runner.pending(), 1);

        runner.execute(
            &mut backend,
            Cmd::batch(vec![
                Cmd::CancelHide(TimerId::new(1)),
                Cmd::ScheduleHide(timer(2)),
            ]),
        );
        assert_eq!(backend.cleared, [1]);
        assert_eq!(runner.pending(), 1);

        runner.timer_fired(TimerId::new(2));
        assert_eq!(runner.pending(), 0);
        runner.execute(&mut backend, Cmd::CancelHide(TimerId::new(2)));
        assert_eq!(backend.cleared, [1]);
    }

    #[test]
    fn refused_timer_fires_immediately() {
        let mut backend = RecordingBackend {
            refuse: true,
            ..RecordingBackend::default()
        };
        let mut runner = EffectRunner::new();
        let followups = runner.execute(&mut backend, Cmd::ScheduleHide(timer(4)));
        assert_eq!(followups, [Msg::HideTimerFired(TimerId::new(4))]);
        assert_eq!(runner.pending(), 0);
        assert_eq!(
            runner.take_error().as_deref(),
            Some("hide-timer#4 not scheduled: quota exceeded")
        );
        assert_eq!(runner.take_error(), None);
    }

    #[test]
    fn modal_recovers_when_timers_are_refused() {
        let mut backend = RecordingBackend {
            refuse: true,
            ..RecordingBackend::default()
        };
        let mut runner = EffectRunner::new();
        let mut program = ModalProgram::new(ModalConfig::default(), HeadlessPage::standard());
        program.update(Msg::PageReady).unwrap();

        let cmd = program.update(Msg::OpenActivated).unwrap();
        runner.execute(&mut backend, cmd);
        let cmd = program.update(Msg::CloseActivated).unwrap();
        for msg in runner.execute(&mut backend, cmd) {
            program.update(msg).unwrap();
        }
        assert_eq!(program.visibility(), Visibility::Hidden);
        assert_eq!(
            program.page().surface("modal").unwrap().display_value(),
            "none"
        );

        let cmd = program.update(Msg::OpenActivated).unwrap();
        runner.execute(&mut backend, cmd);
        assert_eq!(program.open_count(), 2);
        assert_eq!(backend.lines.len(), 2);
    }
}
