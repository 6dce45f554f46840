//! Toolkit runtime configuration.
//!
//! Loaded from `ui.toml` when present; every field has a default so an
//! empty or missing file yields a usable configuration.

use serde::Deserialize;

use crate::error::Result;

/// Tunable timing and interaction parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Caret blink half-period in milliseconds.
    #[serde(default = "default_cursor_blink_ms")]
    pub cursor_blink_ms: u32,
    /// Delay before a held key starts repeating.
    #[serde(default = "default_key_repeat_delay_ms")]
    pub key_repeat_delay_ms: u32,
    /// Interval between repeats of a held key.
    #[serde(default = "default_key_repeat_interval_ms")]
    pub key_repeat_interval_ms: u32,
    /// Maximum gap between two clicks counted as a double click.
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u32,
    /// Pixels scrolled per wheel notch or scrollbar button press.
    #[serde(default = "default_scroll_step")]
    pub scroll_step: u32,
}

fn default_cursor_blink_ms() -> u32 {
    530
}
fn default_key_repeat_delay_ms() -> u32 {
    500
}
fn default_key_repeat_interval_ms() -> u32 {
    35
}
fn default_double_click_ms() -> u32 {
    400
}
fn default_scroll_step() -> u32 {
    12
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            cursor_blink_ms: default_cursor_blink_ms(),
            key_repeat_delay_ms: default_key_repeat_delay_ms(),
            key_repeat_interval_ms: default_key_repeat_interval_ms(),
            double_click_ms: default_double_click_ms(),
            scroll_step: default_scroll_step(),
        }
    }
}

impl UiConfig {
    /// Parse from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
