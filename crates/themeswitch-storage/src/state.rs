//! Persisted state shape
//!
//! Serialized as `{ "settings": { "interface": { "currentTheme": ... } } }`.
//! A `null` theme is the "cleared" sentinel; a missing field falls back to
//! the platform default.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Default theme on macOS hosts
pub const MACOS_DEFAULT_THEME: &str = "macos-tahoe";

/// Default theme on every other platform
pub const FALLBACK_DEFAULT_THEME: &str = "__default";

static DEFAULT_THEME: Lazy<String> = Lazy::new(|| {
    if cfg!(target_os = "macos") {
        MACOS_DEFAULT_THEME.to_string()
    } else {
        FALLBACK_DEFAULT_THEME.to_string()
    }
});

/// Platform-dependent default theme, computed once per process
pub fn default_theme() -> &'static str {
    DEFAULT_THEME.as_str()
}

fn default_current_theme() -> Option<String> {
    Some(default_theme().to_string())
}

/// Interface settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceSettings {
    /// Selected theme; `None` means no theme is applied
    #[serde(default = "default_current_theme")]
    pub current_theme: Option<String>,
}

impl Default for InterfaceSettings {
    fn default() -> Self {
        Self {
            current_theme: default_current_theme(),
        }
    }
}

/// Settings branch of the persisted state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub interface: InterfaceSettings,
}

/// Root of the persisted state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub settings: Settings,
}

impl AppState {
    /// Currently selected theme
    pub fn current_theme(&self) -> Option<&str> {
        self.settings.interface.current_theme.as_deref()
    }
}
