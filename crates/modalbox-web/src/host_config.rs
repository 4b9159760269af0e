#![forbid(unsafe_code)]

//! Config handed to the host from JavaScript.

use modalbox_core::{ConfigError, ModalConfig};

/// Parse the optional JSON config passed to `ModalHost.start`.
///
/// `None` or a blank string selects the defaults. The result is validated so
/// the host never binds with an unusable config.
pub fn parse_host_config(json: Option<&str>) -> Result<ModalConfig, ConfigError> {
    let config = match json.map(str::trim) {
        None | Some("") => ModalConfig::default(),
        Some(text) => ModalConfig::from_json_str(text)?,
    };
    let config = config.validated()?;
    tracing::debug!(
        modal = %config.elements.modal,
        hide_delay_ms = config.hide_delay_ms,
        policy = ?config.close_policy,
        "host config loaded"
    );
    Ok(config)
}
