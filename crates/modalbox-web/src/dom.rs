#![forbid(unsafe_code)]

//! `web-sys` implementations of the page and surface traits.

use std::rc::Rc;

use modalbox_core::{ModalSurface, SurfaceError};
use modalbox_runtime::{ActivationOrigin, Msg, Page, Trigger};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement};

/// Delivers a message to the host's mailbox.
pub(crate) type MessageSink = Rc<dyn Fn(Msg)>;

fn host_error(err: JsValue) -> SurfaceError {
    SurfaceError::Host(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// A live DOM element.
#[derive(Debug, Clone)]
pub(crate) struct DomElement {
    element: HtmlElement,
}

impl ModalSurface for DomElement {
    fn display(&self) -> Result<String, SurfaceError> {
        self.element
            .style()
            .get_property_value("display")
            .map_err(host_error)
    }

    fn set_display(&mut self, value: &str) -> Result<(), SurfaceError> {
        self.element
            .style()
            .set_property("display", value)
            .map_err(host_error)
    }

    fn add_class(&mut self, class: &str) -> Result<(), SurfaceError> {
        self.element.class_list().add_1(class).map_err(host_error)
    }

    fn remove_class(&mut self, class: &str) -> Result<(), SurfaceError> {
        self.element.class_list().remove_1(class).map_err(host_error)
    }

    fn has_class(&self, class: &str) -> Result<bool, SurfaceError> {
        Ok(self.element.class_list().contains(class))
    }
}

/// The document the modal lives in.
///
/// Listener closures are owned here and live as long as the page; there is
/// no unbinding.
pub(crate) struct DomPage {
    document: Document,
    sink: MessageSink,
    listeners: Vec<Closure<dyn FnMut(Event)>>,
}

impl DomPage {
    pub(crate) fn new(document: Document, sink: MessageSink) -> Self {
        Self {
            document,
            sink,
            listeners: Vec::new(),
        }
    }
}

impl Page for DomPage {
    type Element = DomElement;

    fn element_by_id(&self, id: &str) -> Option<DomElement> {
        let element = self.document.get_element_by_id(id)?;
        let element = element.dyn_into::<HtmlElement>().ok()?;
        Some(DomElement { element })
    }

    fn listen(&mut self, element: &DomElement, trigger: Trigger) -> Result<(), SurfaceError> {
        let sink = Rc::clone(&self.sink);
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            // The container is the outermost target only when the backdrop
            // itself is struck.
            let origin = if event.target() == event.current_target() {
                ActivationOrigin::Container
            } else {
                ActivationOrigin::Descendant
            };
            sink(trigger.message(origin));
        });
        element
            .element
            .add_event_listener_with_callback(
                "click",
                callback.as_ref().unchecked_ref::<js_sys::Function>(),
            )
            .map_err(host_error)?;
        self.listeners.push(callback);
        Ok(())
    }
}
