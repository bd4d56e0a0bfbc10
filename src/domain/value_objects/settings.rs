//! Build settings value object

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ordered key/value build settings
pub type SettingsMap = BTreeMap<String, String>;

/// Build settings declared on a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Settings of the node itself
    #[serde(default)]
    pub base: SettingsMap,
    /// Per-configuration overrides, keyed by configuration name
    #[serde(default)]
    pub configurations: BTreeMap<String, SettingsMap>,
    /// Settings every dependent inherits
    #[serde(default)]
    pub propagated: SettingsMap,
}

impl Settings {
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.configurations.is_empty() && self.propagated.is_empty()
    }

    pub fn with_base(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.base.insert(key.into(), value.into());
        self
    }

    pub fn with_propagated(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.propagated.insert(key.into(), value.into());
        self
    }

    pub fn with_configuration(
        mut self,
        configuration: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.configurations
            .entry(configuration.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }
}
