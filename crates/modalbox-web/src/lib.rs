#![forbid(unsafe_code)]

//! DOM host for modalbox.
//!
//! This crate provides [`ModalHost`], a `wasm-bindgen`-exported struct that
//! binds a [`modalbox_runtime::ModalProgram`] to the live document:
//!
//! - DOM `click` listeners and `setTimeout` callbacks become messages in a
//!   single mailbox, drained in arrival order.
//! - `Cmd::ScheduleHide` / `Cmd::CancelHide` map to `setTimeout` /
//!   `clearTimeout`; `Cmd::Report` goes to `console.log`.
//!
//! ```js
//! import init, { ModalHost } from "./modalbox_web.js";
//! await init();
//! const host = ModalHost.start(JSON.stringify({ hide_delay_ms: 300 }));
//! ```

mod effects;
mod host_config;

pub use effects::{EffectBackend, EffectRunner};
pub use host_config::parse_host_config;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::ModalHost;
