#![forbid(unsafe_code)]

//! Modal configuration as data.
//!
//! Captures every tunable of the modal behavior in a single [`ModalConfig`]
//! that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # modalbox.toml
//! visible_display = "block"
//! hide_delay_ms = 300
//! close_policy = "keep-pending"
//!
//! [elements]
//! modal = "signup-modal"
//!
//! [classes]
//! show = "is-open"
//! hide = "is-closing"
//! ```
//!
//! ```rust,ignore
//! let config = ModalConfig::from_toml_file("modalbox.toml")?;
//! let config = ModalConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `ModalConfig::default()` targets the page contract `#modal`,
//! `#openModalBtn`, `#closeModalBtn`, uses `display: flex` when shown,
//! the `show` / `hide` marker classes, and a 500 ms hide delay.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use web_time::Duration;

/// Default hide delay, matching the stylesheet's fade-out duration.
pub const DEFAULT_HIDE_DELAY_MS: u64 = 500;

/// Default report prefix.
pub const DEFAULT_REPORT_PREFIX: &str = "📊";

// ---------------------------------------------------------------------------
// Top-level ModalConfig
// ---------------------------------------------------------------------------

/// Top-level modal configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ModalConfig {
    /// Element ids looked up when the page is ready.
    pub elements: ElementIds,

    /// Marker class names.
    pub classes: ClassNames,

    /// Display value applied when the modal opens.
    pub visible_display: String,

    /// Delay between Close and the modal leaving layout, in milliseconds.
    pub hide_delay_ms: u64,

    /// What Close does while a hide is already pending.
    pub close_policy: ClosePolicy,

    /// Text placed before the open report message.
    pub report_prefix: String,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            elements: ElementIds::default(),
            classes: ClassNames::default(),
            visible_display: "flex".into(),
            hide_delay_ms: DEFAULT_HIDE_DELAY_MS,
            close_policy: ClosePolicy::default(),
            report_prefix: DEFAULT_REPORT_PREFIX.into(),
        }
    }
}

impl ModalConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSerialize)
    }

    /// Hide delay as a [`Duration`].
    #[must_use]
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (field, id) in [
            ("elements.modal", &self.elements.modal),
            ("elements.open_trigger", &self.elements.open_trigger),
            ("elements.close_trigger", &self.elements.close_trigger),
        ] {
            if id.trim().is_empty() {
                errors.push(format!("{field} must not be empty"));
            }
        }

        let ids = [
            &self.elements.modal,
            &self.elements.open_trigger,
            &self.elements.close_trigger,
        ];
        if ids[0] == ids[1] || ids[0] == ids[2] || ids[1] == ids[2] {
            errors.push(format!(
                "elements must be three distinct ids, got {:?}",
                ids
            ));
        }

        for (field, class) in [
            ("classes.show", &self.classes.show),
            ("classes.hide", &self.classes.hide),
        ] {
            if class.is_empty() {
                errors.push(format!("{field} must not be empty"));
            } else if class.chars().any(char::is_whitespace) {
                errors.push(format!(
                    "{field} must be a single class token, got {class:?}"
                ));
            }
        }

        if self.classes.show == self.classes.hide {
            errors.push(format!(
                "classes.show and classes.hide must differ, both are {:?}",
                self.classes.show
            ));
        }

        if crate::visibility::display_is_hidden(&self.visible_display) {
            errors.push(format!(
                "visible_display must be a visible layout mode, got {:?}",
                self.visible_display
            ));
        }

        errors
    }

    /// Validate and return `self`, or every violation at once.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Ids of the three elements the page must provide.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ElementIds {
    /// The modal container (also the backdrop click target).
    pub modal: String,
    /// Control that opens the modal.
    pub open_trigger: String,
    /// Control that closes the modal.
    pub close_trigger: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            modal: "modal".into(),
            open_trigger: "openModalBtn".into(),
            close_trigger: "closeModalBtn".into(),
        }
    }
}

/// The two mutually exclusive marker classes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ClassNames {
    pub show: String,
    pub hide: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            show: "show".into(),
            hide: "hide".into(),
        }
    }
}

/// Behavior of Close while a hide is already pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum ClosePolicy {
    /// Cancel the pending hide timer and start a fresh one.
    #[default]
    Restart,
    /// Keep the pending hide timer; the repeated Close only re-applies classes.
    KeepPending,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a modal configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "config")]
    TomlSerialize(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::TomlSerialize(e) => write!(f, "TOML serialize error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::TomlSerialize(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
