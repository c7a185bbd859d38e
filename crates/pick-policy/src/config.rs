//! Policy configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which side of a replace relationship is ordered first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacePreference {
    /// The package declaring the replace link sorts ahead of the package it replaces
    #[default]
    Replacer,
    /// The replaced package sorts ahead of its replacer
    Original,
}

/// Settings for [`DefaultPolicy`](crate::DefaultPolicy).
///
/// Keys are kebab-case in JSON, and every key is optional:
///
/// ```json
/// {
///     "allow-downgrade": false,
///     "allow-uninstall": true,
///     "replace-preference": "replacer",
///     "excluded-packages": ["vendor/abandoned"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PolicyConfig {
    pub allow_downgrade: bool,
    pub allow_uninstall: bool,
    pub replace_preference: ReplacePreference,
    pub excluded_packages: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allow_downgrade: false,
            allow_uninstall: true,
            replace_preference: ReplacePreference::default(),
            excluded_packages: Vec::new(),
        }
    }
}

impl PolicyConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn allow_downgrade(mut self, allow: bool) -> Self {
        self.allow_downgrade = allow;
        self
    }

    pub fn allow_uninstall(mut self, allow: bool) -> Self {
        self.allow_uninstall = allow;
        self
    }

    pub fn replace_preference(mut self, preference: ReplacePreference) -> Self {
        self.replace_preference = preference;
        self
    }

    /// Exclude a package name from installation
    pub fn exclude_package(mut self, name: impl Into<String>) -> Self {
        self.excluded_packages.push(name.into().to_lowercase());
        self
    }

    /// Whether `name` is listed in `excluded_packages` (case-insensitive)
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_packages
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(name))
    }
}
