#![forbid(unsafe_code)]

//! Runtime: the modal as a single-threaded actor.
//!
//! # Role in modalbox
//! `modalbox-runtime` turns host events into [`Msg`] values, feeds them to a
//! [`ModalProgram`] strictly in arrival order, and returns effects as [`Cmd`]
//! values for the host to execute. The program never touches timers or
//! output directly.
//!
//! # Primary responsibilities
//! - **ModalProgram**: event wiring (`Unbound → Bound`) plus the modal
//!   controller, as one `update(msg) -> Cmd` state machine.
//! - **Page**: the host contract for element lookup and listener registration.
//! - **StepRuntime**: deterministic, host-driven executor with an explicit
//!   clock, used by headless hosts and tests.
//! - **HeadlessPage**: an in-memory page.

pub mod headless;
pub mod program;
pub mod step;
pub mod wiring;

pub use headless::{HeadlessElement, HeadlessPage};
pub use program::{ActivationOrigin, Cmd, ModalProgram, Msg, ProgramError};
pub use step::{StepOutputs, StepRuntime};
pub use wiring::{BindError, ElementRole, Page, PageElements, Trigger};
