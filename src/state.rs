//! Process-wide initialization state of the styling engine.
//!
//! [`InitState`] holds the engine configuration once it is known. It is
//! written at most once: the check and the write happen in a single
//! [`OnceCell::set`], so concurrent or redundant `init` calls are no-ops.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Engine-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Theme selected when the engine starts.
    pub initial_theme: Option<String>,
    /// Follow the system color scheme when light/dark themes exist.
    pub adaptive_themes: bool,
}

/// Configuration of the styling engine.
///
/// # Example
///
/// ```rust
/// use varistyle::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{
///     "themes": { "light": { "colors": { "primary": "blue" } } },
///     "breakpoints": { "sm": 0, "md": 768 },
///     "settings": { "initialTheme": "light" }
/// }"#).unwrap();
///
/// assert_eq!(config.breakpoints["md"], 768);
/// assert_eq!(config.settings.initial_theme.as_deref(), Some("light"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub themes: BTreeMap<String, Value>,
    pub breakpoints: BTreeMap<String, u32>,
    pub settings: Settings,
}

impl EngineConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds a theme, returning the updated config for chaining.
    pub fn theme(mut self, name: &str, theme: Value) -> Self {
        self.themes.insert(name.to_string(), theme);
        self
    }

    /// Adds a breakpoint, returning the updated config for chaining.
    pub fn breakpoint(mut self, name: &str, min_width: u32) -> Self {
        self.breakpoints.insert(name.to_string(), min_width);
        self
    }

    /// Name and value of the theme that is active at startup.
    ///
    /// Uses `settings.initial_theme` when it names a known theme, otherwise
    /// the first theme by name.
    pub fn active_theme(&self) -> Option<(&str, &Value)> {
        self.settings
            .initial_theme
            .as_deref()
            .and_then(|name| self.themes.get_key_value(name))
            .or_else(|| self.themes.iter().next())
            .map(|(name, theme)| (name.as_str(), theme))
    }
}

/// Whether the styling engine has been configured, and with what.
#[derive(Debug, Default)]
pub struct InitState {
    config: OnceCell<EngineConfig>,
}

impl InitState {
    /// Creates an uninitialized state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.config.get().is_some()
    }

    /// Initializes the state with `config`.
    ///
    /// Returns `true` if this call performed the initialization. When the
    /// state is already initialized, `config` is dropped and `false` is
    /// returned.
    pub fn init(&self, config: EngineConfig) -> bool {
        let performed = self.config.set(config).is_ok();
        if performed {
            tracing::debug!("styling engine initialized");
        } else {
            tracing::trace!("styling engine already initialized, ignoring init");
        }
        performed
    }

    /// The configuration, if initialized.
    pub fn config(&self) -> Option<&EngineConfig> {
        self.config.get()
    }
}

static GLOBAL_STATE: Lazy<Arc<InitState>> = Lazy::new(|| Arc::new(InitState::new()));

/// The process-wide initialization state used by the free [`create`](crate::create) function.
pub fn global_state() -> Arc<InitState> {
    Arc::clone(&GLOBAL_STATE)
}
