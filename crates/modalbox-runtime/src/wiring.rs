#![forbid(unsafe_code)]

//! Event wiring: element lookup and listener registration.
//!
//! Binding happens once, when the page reports its structure is ready. All
//! three elements are looked up before any listener is registered, so a
//! missing element leaves the page without bindings. Registration records
//! each listener as it lands; a retry after a partial failure registers only
//! the missing ones.

use modalbox_core::{ElementIds, ModalSurface, SurfaceError};

use crate::program::{ActivationOrigin, Msg};

/// Which listener a host registers on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Activation of the open control.
    Open,
    /// Activation of the close control.
    Close,
    /// Activation anywhere inside the modal container.
    Backdrop,
}

impl Trigger {
    /// Message a host delivers when this listener fires.
    pub fn message(self, origin: ActivationOrigin) -> Msg {
        match self {
            Self::Open => Msg::OpenActivated,
            Self::Close => Msg::CloseActivated,
            Self::Backdrop => Msg::BackdropActivated { origin },
        }
    }
}

/// Role an element plays in the page contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    Modal,
    OpenTrigger,
    CloseTrigger,
}

impl ElementRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Modal => "modal container",
            Self::OpenTrigger => "open trigger",
            Self::CloseTrigger => "close trigger",
        }
    }
}

/// Host page the program binds to.
pub trait Page {
    /// Element handle the host hands out. Handles refer to live elements, so
    /// writes through one are visible through any other for the same id.
    type Element: ModalSurface;

    /// Look up an element by its stable id.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Register a listener on `element` that delivers `trigger` messages for
    /// the lifetime of the page.
    fn listen(&mut self, element: &Self::Element, trigger: Trigger) -> Result<(), SurfaceError>;
}

/// Binding failure. Fatal: there is no retry or fallback element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// A required element is not in the page.
    MissingElement { role: ElementRole, id: String },
    /// The host refused to register a listener.
    Listen(SurfaceError),
}

impl core::fmt::Display for BindError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingElement { role, id } => {
                write!(f, "missing {} element #{id}", role.label())
            }
            Self::Listen(err) => write!(f, "listener registration failed: {err}"),
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingElement { .. } => None,
            Self::Listen(err) => Some(err),
        }
    }
}

impl From<SurfaceError> for BindError {
    fn from(err: SurfaceError) -> Self {
        Self::Listen(err)
    }
}

fn require<P: Page>(page: &P, role: ElementRole, id: &str) -> Result<P::Element, BindError> {
    page.element_by_id(id).ok_or_else(|| BindError::MissingElement {
        role,
        id: id.to_owned(),
    })
}

/// The three elements of the page contract.
#[derive(Debug, Clone)]
pub struct PageElements<E> {
    pub modal: E,
    pub open: E,
    pub close: E,
}

/// Look up the three elements without touching the page.
pub fn lookup<P: Page>(
    page: &P,
    ids: &ElementIds,
) -> Result<PageElements<P::Element>, BindError> {
    Ok(PageElements {
        modal: require(page, ElementRole::Modal, &ids.modal)?,
        open: require(page, ElementRole::OpenTrigger, &ids.open_trigger)?,
        close: require(page, ElementRole::CloseTrigger, &ids.close_trigger)?,
    })
}

/// Register the open, close and backdrop listeners.
///
/// Triggers already in `registered` are skipped and every successful
/// registration is appended to it, so a page never receives a trigger twice.
pub fn register<P: Page>(
    page: &mut P,
    elements: &PageElements<P::Element>,
    registered: &mut Vec<Trigger>,
) -> Result<(), BindError> {
    for (element, trigger) in [
        (&elements.open, Trigger::Open),
        (&elements.close, Trigger::Close),
        (&elements.modal, Trigger::Backdrop),
    ] {
        if registered.contains(&trigger) {
            continue;
        }
        page.listen(element, trigger)?;
        registered.push(trigger);
    }
    tracing::debug!(listeners = registered.len(), "modal bindings registered");
    Ok(())
}
