#![forbid(unsafe_code)]

//! Host-driven step executor.
//!
//! Design goals:
//! - **Host-driven input**: the embedding environment pushes messages.
//! - **Deterministic time**: the host advances a monotonic clock explicitly;
//!   hide timers fire only from [`StepRuntime::advance`].
//! - **No blocking / no threads**.
//!
//! ```
//! use modalbox_core::ModalConfig;
//! use modalbox_runtime::{HeadlessPage, Msg, StepRuntime};
//! use std::time::Duration;
//!
//! let mut rt = StepRuntime::new(ModalConfig::default(), HeadlessPage::standard());
//! rt.dispatch(Msg::PageReady).unwrap();
//! rt.click("openModalBtn").unwrap();
//! assert_eq!(rt.outputs().reports, ["📊 Modal has been opened 1 time(s)."]);
//!
//! rt.click("closeModalBtn").unwrap();
//! rt.advance(Duration::from_millis(500)).unwrap();
//! assert_eq!(rt.surface("modal").unwrap().display_value(), "none");
//! ```

use std::collections::{BTreeMap, VecDeque};

use modalbox_core::{DeterministicClock, MemorySurface, ModalConfig, TimerId, Visibility};
use web_time::Duration;

use crate::headless::HeadlessPage;
use crate::program::{ActivationOrigin, Cmd, ModalProgram, Msg, ProgramError};
use crate::wiring::Page;

/// Captured outputs for host consumption.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StepOutputs {
    /// Report lines, in emission order.
    pub reports: Vec<String>,
    /// Messages processed so far.
    pub processed: u64,
}

/// Deterministic executor for a [`ModalProgram`].
pub struct StepRuntime<P: Page> {
    program: ModalProgram<P>,
    clock: DeterministicClock,
    mailbox: VecDeque<Msg>,
    timers: BTreeMap<TimerId, Duration>,
    outputs: StepOutputs,
}

impl<P: Page> StepRuntime<P> {
    /// Create a runtime at time zero with an unbound program.
    pub fn new(config: ModalConfig, page: P) -> Self {
        Self {
            program: ModalProgram::new(config, page),
            clock: DeterministicClock::new(),
            mailbox: VecDeque::new(),
            timers: BTreeMap::new(),
            outputs: StepOutputs::default(),
        }
    }

    pub fn program(&self) -> &ModalProgram<P> {
        &self.program
    }

    pub fn page(&self) -> &P {
        self.program.page()
    }

    /// Current monotonic time.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn visibility(&self) -> Visibility {
        self.program.visibility()
    }

    pub fn open_count(&self) -> u64 {
        self.program.open_count()
    }

    pub fn outputs(&self) -> &StepOutputs {
        &self.outputs
    }

    /// Take captured outputs, leaving them empty.
    pub fn take_outputs(&mut self) -> StepOutputs {
        std::mem::take(&mut self.outputs)
    }

    /// Scheduled hide timers and their deadlines, oldest first.
    pub fn pending_timers(&self) -> impl Iterator<Item = (TimerId, Duration)> + '_ {
        self.timers.iter().map(|(&id, &deadline)| (id, deadline))
    }

    /// Queue a message without processing it.
    pub fn push(&mut self, msg: Msg) {
        self.mailbox.push_back(msg);
    }

    /// Number of queued messages.
    pub fn queued(&self) -> usize {
        self.mailbox.len()
    }

    /// Process queued messages in arrival order until the mailbox is empty.
    ///
    /// Stops at the first error; the failing message is consumed and the
    /// rest stay queued.
    pub fn step(&mut self) -> Result<usize, ProgramError> {
        let mut processed = 0;
        while let Some(msg) = self.mailbox.pop_front() {
            let cmd = self.program.update(msg)?;
            self.outputs.processed += 1;
            processed += 1;
            self.execute(cmd);
        }
        Ok(processed)
    }

    /// Queue `msg` and process the mailbox.
    pub fn dispatch(&mut self, msg: Msg) -> Result<usize, ProgramError> {
        self.push(msg);
        self.step()
    }

    /// Advance the clock by `dt`, fire every timer that came due, and process
    /// the mailbox.
    pub fn advance(&mut self, dt: Duration) -> Result<usize, ProgramError> {
        self.clock.advance(dt);
        let now = self.clock.now();

        let mut due: Vec<(Duration, TimerId)> = self
            .timers
            .iter()
            .filter(|&(_, &deadline)| deadline <= now)
            .map(|(&id, &deadline)| (deadline, id))
            .collect();
        due.sort_unstable();
        for &(_, id) in &due {
            self.timers.remove(&id);
            self.mailbox.push_back(Msg::HideTimerFired(id));
        }
        self.step()
    }

    fn execute(&mut self, cmd: Cmd) {
        for cmd in cmd.into_flat() {
            match cmd {
                Cmd::None | Cmd::Batch(_) => {}
                Cmd::Report(report) => {
                    report.emit();
                    self.outputs.reports.push(report.to_string());
                }
                Cmd::ScheduleHide(timer) => {
                    let deadline = self.clock.now().saturating_add(timer.delay);
                    tracing::trace!(timer = %timer.id, ?deadline, "hide timer scheduled");
                    self.timers.insert(timer.id, deadline);
                }
                Cmd::CancelHide(id) => {
                    if self.timers.remove(&id).is_some() {
                        tracing::trace!(timer = %id, "hide timer cancelled");
                    }
                }
            }
        }
    }
}

impl StepRuntime<HeadlessPage> {
    /// Activate element `id` and process the resulting messages.
    pub fn activate(&mut self, id: &str, origin: ActivationOrigin) -> Result<usize, ProgramError> {
        for msg in self.page().activate(id, origin) {
            self.mailbox.push_back(msg);
        }
        self.step()
    }

    /// Click element `id` directly.
    pub fn click(&mut self, id: &str) -> Result<usize, ProgramError> {
        self.activate(id, ActivationOrigin::Container)
    }

    /// Snapshot of an element's surface.
    pub fn surface(&self, id: &str) -> Option<MemorySurface> {
        self.page().surface(id)
    }
}
