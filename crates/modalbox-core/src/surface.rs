#![forbid(unsafe_code)]

//! Host element contract for the modal.
//!
//! The controller never touches the DOM directly. It drives a
//! [`ModalSurface`], which the web host implements on top of an
//! `HtmlElement` and headless hosts implement with [`MemorySurface`].

use std::cell::RefCell;
use std::rc::Rc;

/// Surface error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The host rejected an element operation (e.g. a DOM exception).
    Host(String),
}

impl core::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Host(msg) => write!(f, "host element operation failed: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// The external UI element a modal controller drives.
///
/// Only two aspects of the element are touched: its layout `display`
/// property and its class list.
pub trait ModalSurface {
    /// Current raw `display` value. The empty string means "unset".
    fn display(&self) -> Result<String, SurfaceError>;

    /// Set the raw `display` value.
    fn set_display(&mut self, value: &str) -> Result<(), SurfaceError>;

    /// Add `class` to the class list. Adding a present class is a no-op.
    fn add_class(&mut self, class: &str) -> Result<(), SurfaceError>;

    /// Remove `class` from the class list. Removing an absent class is a no-op.
    fn remove_class(&mut self, class: &str) -> Result<(), SurfaceError>;

    /// Whether `class` is currently present.
    fn has_class(&self, class: &str) -> Result<bool, SurfaceError>;
}

impl<S: ModalSurface + ?Sized> ModalSurface for Rc<RefCell<S>> {
    fn display(&self) -> Result<String, SurfaceError> {
        self.borrow().display()
    }

    fn set_display(&mut self, value: &str) -> Result<(), SurfaceError> {
        self.borrow_mut().set_display(value)
    }

    fn add_class(&mut self, class: &str) -> Result<(), SurfaceError> {
        self.borrow_mut().add_class(class)
    }

    fn remove_class(&mut self, class: &str) -> Result<(), SurfaceError> {
        self.borrow_mut().remove_class(class)
    }

    fn has_class(&self, class: &str) -> Result<bool, SurfaceError> {
        self.borrow().has_class(class)
    }
}

/// In-memory element for headless hosts and tests.
///
/// Class order follows insertion, like a DOM token list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    display: String,
    classes: Vec<String>,
}

impl MemorySurface {
    /// Create a surface with an unset display and no classes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface with the given initial display value.
    #[must_use]
    pub fn with_display(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            classes: Vec::new(),
        }
    }

    /// Current class list, in insertion order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Current display value without going through the trait.
    pub fn display_value(&self) -> &str {
        &self.display
    }
}

impl ModalSurface for MemorySurface {
    fn display(&self) -> Result<String, SurfaceError> {
        Ok(self.display.clone())
    }

    fn set_display(&mut self, value: &str) -> Result<(), SurfaceError> {
        value.clone_into(&mut self.display);
        Ok(())
    }

    fn add_class(&mut self, class: &str) -> Result<(), SurfaceError> {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_owned());
        }
        Ok(())
    }

    fn remove_class(&mut self, class: &str) -> Result<(), SurfaceError> {
        self.classes.retain(|c| c != class);
        Ok(())
    }

    fn has_class(&self, class: &str) -> Result<bool, SurfaceError> {
        Ok(self.classes.iter().any(|c| c == class))
    }
}
