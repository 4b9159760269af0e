#![forbid(unsafe_code)]

//! In-memory page for native hosts and tests.
//!
//! Elements are [`MemorySurface`]s shared between the page and every handle
//! the page hands out. Activations are translated to messages using the
//! listeners the program registered, so an element with no listener produces
//! no message.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use modalbox_core::{MemorySurface, ModalSurface, SurfaceError};

use crate::program::{ActivationOrigin, Msg};
use crate::wiring::{Page, Trigger};

/// Handle to an element of a [`HeadlessPage`].
#[derive(Debug, Clone)]
pub struct HeadlessElement {
    id: Rc<str>,
    surface: Rc<RefCell<MemorySurface>>,
}

impl HeadlessElement {
    /// The element's id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl ModalSurface for HeadlessElement {
    fn display(&self) -> Result<String, SurfaceError> {
        self.surface.display()
    }

    fn set_display(&mut self, value: &str) -> Result<(), SurfaceError> {
        self.surface.set_display(value)
    }

    fn add_class(&mut self, class: &str) -> Result<(), SurfaceError> {
        self.surface.add_class(class)
    }

    fn remove_class(&mut self, class: &str) -> Result<(), SurfaceError> {
        self.surface.remove_class(class)
    }

    fn has_class(&self, class: &str) -> Result<bool, SurfaceError> {
        self.surface.has_class(class)
    }
}

/// A page made of in-memory elements.
#[derive(Debug, Default)]
pub struct HeadlessPage {
    elements: HashMap<String, HeadlessElement>,
    listeners: HashMap<String, Vec<Trigger>>,
}

impl HeadlessPage {
    /// Create an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with the default contract: `#modal`, `#openModalBtn`,
    /// `#closeModalBtn`, all with unset display.
    #[must_use]
    pub fn standard() -> Self {
        let mut page = Self::new();
        page.insert("modal");
        page.insert("openModalBtn");
        page.insert("closeModalBtn");
        page
    }

    /// Add an element with unset display.
    pub fn insert(&mut self, id: &str) -> HeadlessElement {
        self.insert_surface(id, MemorySurface::new())
    }

    /// Add an element with the given initial surface.
    pub fn insert_surface(&mut self, id: &str, surface: MemorySurface) -> HeadlessElement {
        let element = HeadlessElement {
            id: Rc::from(id),
            surface: Rc::new(RefCell::new(surface)),
        };
        self.elements.insert(id.to_owned(), element.clone());
        element
    }

    /// Snapshot of an element's current surface.
    pub fn surface(&self, id: &str) -> Option<MemorySurface> {
        self.elements
            .get(id)
            .map(|element| element.surface.borrow().clone())
    }

    /// Listeners registered on `id`, in registration order.
    pub fn listeners(&self, id: &str) -> &[Trigger] {
        self.listeners
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Messages produced by activating element `id`.
    ///
    /// `origin` says whether the element itself or a nested element was
    /// struck; only container listeners care.
    pub fn activate(&self, id: &str, origin: ActivationOrigin) -> Vec<Msg> {
        self.listeners(id)
            .iter()
            .map(|trigger| trigger.message(origin))
            .collect()
    }

    /// Messages produced by clicking element `id` directly.
    pub fn click(&self, id: &str) -> Vec<Msg> {
        self.activate(id, ActivationOrigin::Container)
    }
}

impl Page for HeadlessPage {
    type Element = HeadlessElement;

    fn element_by_id(&self, id: &str) -> Option<HeadlessElement> {
        self.elements.get(id).cloned()
    }

    fn listen(&mut self, element: &HeadlessElement, trigger: Trigger) -> Result<(), SurfaceError> {
        self.listeners
            .entry(element.id().to_owned())
            .or_default()
            .push(trigger);
        Ok(())
    }
}
