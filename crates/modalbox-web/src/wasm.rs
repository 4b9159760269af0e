#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the modal host.
//!
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use modalbox_core::{HideTimer, TimerId};
use modalbox_runtime::{ModalProgram, Msg};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::dom::{DomPage, MessageSink};
use crate::effects::{EffectBackend, EffectRunner};
use crate::host_config::parse_host_config;

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

/// Single mailbox shared by every DOM callback.
///
/// Callbacks enqueue and then pump. A pump that finds the host already
/// borrowed returns immediately; the running pump drains the new message.
#[derive(Clone)]
struct Mailbox {
    queue: Rc<RefCell<VecDeque<Msg>>>,
    host: Weak<RefCell<HostInner>>,
}

impl Mailbox {
    fn send(&self, msg: Msg) {
        self.queue.borrow_mut().push_back(msg);
        self.pump();
    }

    fn pump(&self) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        let Ok(mut inner) = host.try_borrow_mut() else {
            return;
        };
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(msg) = next else {
                break;
            };
            inner.handle(msg);
        }
    }
}

/// `setTimeout` / `clearTimeout` and `console.log` on the window.
struct WindowBackend {
    window: Window,
    on_timer: Closure<dyn FnMut(JsValue)>,
}

impl EffectBackend for WindowBackend {
    fn log(&mut self, line: &str) {
        web_sys::console::log_1(&JsValue::from_str(line));
    }

    fn set_timeout(&mut self, timer: &HideTimer) -> Result<i32, String> {
        let delay = i32::try_from(timer.delay.as_millis()).unwrap_or(i32::MAX);
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_1(
                self.on_timer.as_ref().unchecked_ref::<js_sys::Function>(),
                delay,
                &JsValue::from_f64(timer.id.get() as f64),
            )
            .map_err(|err| err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }

    fn clear_timeout(&mut self, handle: i32) {
        self.window.clear_timeout_with_handle(handle);
    }
}

struct HostInner {
    program: ModalProgram<DomPage>,
    backend: WindowBackend,
    effects: EffectRunner,
    queue: Rc<RefCell<VecDeque<Msg>>>,
    _on_ready: Option<Closure<dyn FnMut()>>,
    last_error: Option<String>,
}

impl HostInner {
    fn handle(&mut self, msg: Msg) {
        if let Msg::HideTimerFired(id) = msg {
            self.effects.timer_fired(id);
        }
        match self.program.update(msg) {
            Ok(cmd) => {
                let followups = self.effects.execute(&mut self.backend, cmd);
                if let Some(err) = self.effects.take_error() {
                    self.record_error(err);
                }
                self.queue.borrow_mut().extend(followups);
            }
            Err(err) => self.record_error(err.to_string()),
        }
    }

    fn record_error(&mut self, err: String) {
        let text = format!("modalbox: {err}");
        web_sys::console::error_1(&JsValue::from_str(&text));
        self.last_error = Some(text);
    }
}

/// Modal host bound to the current document.
#[wasm_bindgen]
pub struct ModalHost {
    inner: Rc<RefCell<HostInner>>,
    mailbox: Mailbox,
}

#[wasm_bindgen]
impl ModalHost {
    /// Start the host.
    ///
    /// `config_json` overrides any subset of the defaults. Bindings are
    /// registered on `DOMContentLoaded`, or right away if the document has
    /// already been parsed. Keep the returned host alive for as long as the
    /// modal should respond.
    pub fn start(config_json: Option<String>) -> Result<ModalHost, JsValue> {
        install_panic_hook();

        let config = parse_host_config(config_json.as_deref())
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let queue = Rc::new(RefCell::new(VecDeque::new()));

        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<HostInner>>| {
            let mailbox = Mailbox {
                queue: Rc::clone(&queue),
                host: weak.clone(),
            };
            let page_mailbox = mailbox.clone();
            let sink: MessageSink = Rc::new(move |msg: Msg| page_mailbox.send(msg));
            let on_timer = Closure::<dyn FnMut(JsValue)>::new(move |id: JsValue| {
                if let Some(raw) = id.as_f64() {
                    mailbox.send(Msg::HideTimerFired(TimerId::new(raw as u64)));
                }
            });
            RefCell::new(HostInner {
                program: ModalProgram::new(config, DomPage::new(document.clone(), sink)),
                backend: WindowBackend {
                    window: window.clone(),
                    on_timer,
                },
                effects: EffectRunner::new(),
                queue: Rc::clone(&queue),
                _on_ready: None,
                last_error: None,
            })
        });

        let mailbox = Mailbox {
            queue,
            host: Rc::downgrade(&inner),
        };

        if document.ready_state() == "loading" {
            let ready_mailbox = mailbox.clone();
            let on_ready = Closure::<dyn FnMut()>::new(move || {
                ready_mailbox.send(Msg::PageReady);
            });
            document.add_event_listener_with_callback(
                "DOMContentLoaded",
                on_ready.as_ref().unchecked_ref::<js_sys::Function>(),
            )?;
            inner.borrow_mut()._on_ready = Some(on_ready);
        } else {
            mailbox.send(Msg::PageReady);
        }

        Ok(ModalHost { inner, mailbox })
    }

    /// Whether the page bindings are registered.
    #[wasm_bindgen(js_name = isBound)]
    pub fn is_bound(&self) -> bool {
        self.inner.borrow().program.is_bound()
    }

    /// Number of times the modal has been opened.
    #[wasm_bindgen(js_name = openCount)]
    pub fn open_count(&self) -> f64 {
        self.inner.borrow().program.open_count() as f64
    }

    /// `"hidden"`, `"showing"`, or `"hiding"`.
    pub fn visibility(&self) -> String {
        self.inner.borrow().program.visibility().label().to_owned()
    }

    /// Last binding or update error, if any.
    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.inner.borrow().last_error.clone()
    }

    /// Deliver the page-ready signal manually, for pages that build the
    /// modal markup after `DOMContentLoaded`.
    #[wasm_bindgen(js_name = pageReady)]
    pub fn page_ready(&self) {
        self.mailbox.send(Msg::PageReady);
    }
}
