// SPDX-License-Identifier: MPL-2.0
//! Toaster configuration: loosely typed settings, instance overrides and the
//! merged options a container runs with.
//!
//! Instance overrides use the toaster's hyphenated key names and can be built
//! in code, parsed from a TOML string, or loaded from a TOML file:
//!
//! ```toml
//! close-button = { toast-info = true }
//! time-out = 3000
//! newest-on-top = true
//! limit = 5
//! ```
//!
//! # Examples
//!
//! ```
//! use toaster_core::config::{Options, Overrides, Setting};
//!
//! let overrides = Overrides::from_toml_str("time-out = { toast-info = 5 }").unwrap();
//! let options = Options::from_overrides(&overrides);
//! assert_eq!(options.time_out, Setting::per_type([("toast-info", 5)]));
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

// =============================================================================
// Setting
// =============================================================================

/// A configuration value that may take several shapes.
///
/// Keys such as `close-button` and `time-out` accept either one uniform value
/// or a table keyed by icon class. Which shapes are meaningful depends on the
/// key; the resolver classifies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Setting {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    PerType(BTreeMap<String, Setting>),
}

impl Setting {
    /// Builds a per-type table from `(class, value)` pairs.
    pub fn per_type<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Setting>,
    {
        Setting::PerType(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the numeric value of an integer or float setting.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Setting::Integer(value) => Some(*value as f64),
            Setting::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value of a boolean setting.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Setting::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Short name of the value's shape, used in diagnostics.
    #[must_use]
    pub fn shape_name(&self) -> &'static str {
        match self {
            Setting::Bool(_) => "boolean",
            Setting::Integer(_) => "integer",
            Setting::Float(_) => "float",
            Setting::Text(_) => "text",
            Setting::PerType(_) => "per-type table",
        }
    }
}

impl From<bool> for Setting {
    fn from(value: bool) -> Self {
        Setting::Bool(value)
    }
}

impl From<i32> for Setting {
    fn from(value: i32) -> Self {
        Setting::Integer(i64::from(value))
    }
}

impl From<i64> for Setting {
    fn from(value: i64) -> Self {
        Setting::Integer(value)
    }
}

impl From<u32> for Setting {
    fn from(value: u32) -> Self {
        Setting::Integer(i64::from(value))
    }
}

impl From<u64> for Setting {
    fn from(value: u64) -> Self {
        Setting::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Setting {
    fn from(value: f64) -> Self {
        Setting::Float(value)
    }
}

impl From<&str> for Setting {
    fn from(value: &str) -> Self {
        Setting::Text(value.to_string())
    }
}

impl From<String> for Setting {
    fn from(value: String) -> Self {
        Setting::Text(value)
    }
}

impl From<BTreeMap<String, Setting>> for Setting {
    fn from(value: BTreeMap<String, Setting>) -> Self {
        Setting::PerType(value)
    }
}

// =============================================================================
// Overrides
// =============================================================================

/// Instance-level overrides supplied once when a container is mounted.
///
/// Every field is optional; an absent field inherits the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Overrides {
    /// Boolean or per-type table of booleans.
    pub close_button: Option<Setting>,
    /// Delay in milliseconds or per-type table of delays.
    #[serde(alias = "timeout")]
    pub time_out: Option<Setting>,
    pub newest_on_top: Option<bool>,
    pub limit: Option<usize>,
    pub prevent_duplicates: Option<bool>,
    pub tap_to_dismiss: Option<bool>,
    pub mouseover_timer_stop: Option<bool>,
    /// Replaces the whole kind-to-class table.
    pub icon_classes: Option<BTreeMap<String, String>>,
    pub icon_class: Option<String>,
    pub toaster_id: Option<String>,
}

impl Overrides {
    /// Parses overrides from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::ConfigParse`] when the text is not valid
    /// TOML or a key holds a value no [`Setting`] shape accepts.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the overrides back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::ConfigSerialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Loads overrides from a TOML file.
///
/// A file that exists but does not parse yields empty overrides, so a broken
/// configuration degrades to the built-in defaults instead of failing the
/// mount.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn load_from_path(path: &Path) -> Result<Overrides> {
    let content = fs::read_to_string(path)?;
    match Overrides::from_toml_str(&content) {
        Ok(overrides) => Ok(overrides),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring invalid toaster configuration");
            Ok(Overrides::default())
        }
    }
}

/// Writes overrides to a TOML file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if serialization or any filesystem operation fails.
pub fn save_to_path(overrides: &Overrides, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = overrides.to_toml_string()?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Options
// =============================================================================

/// Merged configuration a container runs with (defaults < instance overrides).
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub close_button: Setting,
    pub time_out: Setting,
    pub newest_on_top: bool,
    pub limit: usize,
    pub prevent_duplicates: bool,
    pub tap_to_dismiss: bool,
    pub mouseover_timer_stop: bool,
    pub icon_classes: BTreeMap<String, String>,
    pub icon_class: String,
    pub toaster_id: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            close_button: Setting::Bool(DEFAULT_CLOSE_BUTTON),
            time_out: Setting::Integer(DEFAULT_TIMEOUT_MS),
            newest_on_top: DEFAULT_NEWEST_ON_TOP,
            limit: DEFAULT_LIMIT,
            prevent_duplicates: DEFAULT_PREVENT_DUPLICATES,
            tap_to_dismiss: DEFAULT_TAP_TO_DISMISS,
            mouseover_timer_stop: DEFAULT_MOUSEOVER_TIMER_STOP,
            icon_classes: DEFAULT_ICON_CLASSES
                .iter()
                .map(|(kind, class)| ((*kind).to_string(), (*class).to_string()))
                .collect(),
            icon_class: DEFAULT_ICON_CLASS.to_string(),
            toaster_id: None,
        }
    }
}

impl Options {
    /// Applies `overrides` on top of the built-in defaults.
    #[must_use]
    pub fn from_overrides(overrides: &Overrides) -> Self {
        Self::default().merged(overrides)
    }

    /// Returns a copy of `self` with every present override applied.
    ///
    /// The merge is shallow: a per-type table or icon class table in the
    /// overrides replaces the lower layer's value as a whole.
    #[must_use]
    pub fn merged(&self, overrides: &Overrides) -> Self {
        Self {
            close_button: overrides
                .close_button
                .clone()
                .unwrap_or_else(|| self.close_button.clone()),
            time_out: overrides
                .time_out
                .clone()
                .unwrap_or_else(|| self.time_out.clone()),
            newest_on_top: overrides.newest_on_top.unwrap_or(self.newest_on_top),
            limit: overrides.limit.unwrap_or(self.limit),
            prevent_duplicates: overrides
                .prevent_duplicates
                .unwrap_or(self.prevent_duplicates),
            tap_to_dismiss: overrides.tap_to_dismiss.unwrap_or(self.tap_to_dismiss),
            mouseover_timer_stop: overrides
                .mouseover_timer_stop
                .unwrap_or(self.mouseover_timer_stop),
            icon_classes: overrides
                .icon_classes
                .clone()
                .unwrap_or_else(|| self.icon_classes.clone()),
            icon_class: overrides
                .icon_class
                .clone()
                .unwrap_or_else(|| self.icon_class.clone()),
            toaster_id: overrides
                .toaster_id
                .clone()
                .or_else(|| self.toaster_id.clone()),
        }
    }

    /// Reports settings whose shape will be ignored during resolution.
    ///
    /// Such settings never fail a mount; they resolve to the inert choice (no
    /// close button, no timer). The container logs these when it mounts.
    #[must_use]
    pub fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        match &self.close_button {
            Setting::Bool(_) => {}
            Setting::PerType(table) => {
                for (class, value) in table {
                    if value.as_bool().is_none() {
                        issues.push(ConfigIssue::InvalidEntry {
                            key: "close-button",
                            class: class.clone(),
                            found: value.shape_name(),
                        });
                    }
                }
            }
            other => issues.push(ConfigIssue::InvalidShape {
                key: "close-button",
                found: other.shape_name(),
            }),
        }

        match &self.time_out {
            Setting::Integer(_) | Setting::Float(_) => {}
            Setting::PerType(table) => {
                for (class, value) in table {
                    if value.as_number().is_none() {
                        issues.push(ConfigIssue::InvalidEntry {
                            key: "time-out",
                            class: class.clone(),
                            found: value.shape_name(),
                        });
                    }
                }
            }
            other => issues.push(ConfigIssue::InvalidShape {
                key: "time-out",
                found: other.shape_name(),
            }),
        }

        issues
    }
}

/// A configuration value that resolution will ignore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// The key holds a shape it does not accept.
    InvalidShape {
        key: &'static str,
        found: &'static str,
    },
    /// One entry of a per-type table holds the wrong shape.
    InvalidEntry {
        key: &'static str,
        class: String,
        found: &'static str,
    },
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::InvalidShape { key, found } => {
                write!(f, "`{key}` does not accept a {found} value")
            }
            ConfigIssue::InvalidEntry { key, class, found } => {
                write!(f, "`{key}.{class}` does not accept a {found} value")
            }
        }
    }
}
