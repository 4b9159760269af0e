#![forbid(unsafe_code)]

//! Core: modal visibility state machine, open counter, and host surfaces.
//!
//! # Role in modalbox
//! `modalbox-core` owns the behavior of a single modal dialog. It knows
//! nothing about messages or event loops; the runtime (`modalbox-runtime`)
//! drives a [`ModalController`] in response to host events.
//!
//! # Primary responsibilities
//! - **ModalController**: Open / Close / hide completion, validated against an
//!   explicit [`Visibility`] state.
//! - **OpenCounter**: monotonic count of Hidden → Showing transitions.
//! - **ModalSurface**: the host element contract (display property + marker
//!   classes), with an in-memory [`MemorySurface`] for headless hosts.
//! - **ModalConfig**: element ids, class names, delays, and close policy.
//! - **OpenReport**: the diagnostic line emitted per open activation.

pub mod config;
pub mod controller;
pub mod counter;
pub mod report;
pub mod surface;
pub mod timer;
pub mod visibility;

pub use config::{ClassNames, ClosePolicy, ConfigError, ElementIds, ModalConfig};
pub use controller::{CloseOutcome, ModalController, OpenOutcome};
pub use counter::OpenCounter;
pub use report::{OpenReport, report_count};
pub use surface::{MemorySurface, ModalSurface, SurfaceError};
pub use timer::{DeterministicClock, HideTimer, TimerId};
pub use visibility::Visibility;
