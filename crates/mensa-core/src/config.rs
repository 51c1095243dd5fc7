#![forbid(unsafe_code)]

//! Policy-as-data configuration for the preference stack.
//!
//! Every field defaults to the values the canteen page has always used, so
//! `PrefsConfig::default()` works unchanged against the stock markup.
//!
//! ```json
//! {
//!   "storage": { "order_key": "canteen-order" },
//!   "sections": [0, 99],
//!   "layout": { "height_breakpoint_px": 768 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::PrefsError;

/// Index of one parallel section (a day column).
pub type SectionId = u32;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefsConfig {
    /// Persistent store key names.
    pub storage: StorageKeys,
    /// Sections every item is rendered in, in document order.
    pub sections: Vec<SectionId>,
    /// Responsive layout parameters.
    pub layout: LayoutConfig,
    /// Remote configuration endpoint contract.
    pub remote: RemoteConfig,
}

impl Default for PrefsConfig {
    fn default() -> Self {
        Self {
            storage: StorageKeys::default(),
            sections: vec![0, 99],
            layout: LayoutConfig::default(),
            remote: RemoteConfig::default(),
        }
    }
}

impl PrefsConfig {
    /// Load from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, PrefsError> {
        let config: Self = serde_json::from_str(s)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(PrefsError::Validation(errors))
        }
    }

    /// Validate all parameters.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.storage.order_key.is_empty() {
            errors.push("storage.order_key must not be empty".to_owned());
        }
        if self.storage.hidden_key.is_empty() {
            errors.push("storage.hidden_key must not be empty".to_owned());
        }
        if self.storage.order_key == self.storage.hidden_key {
            errors.push(format!(
                "storage.order_key and storage.hidden_key must differ (both {:?})",
                self.storage.order_key
            ));
        }
        if self.sections.is_empty() {
            errors.push("sections must list at least one section".to_owned());
        }
        for (index, section) in self.sections.iter().enumerate() {
            if self.sections[..index].contains(section) {
                errors.push(format!("sections lists {section} more than once"));
            }
        }
        let breakpoint = self.layout.height_breakpoint_px;
        if !breakpoint.is_finite() || breakpoint < 0.0 {
            errors.push(format!(
                "layout.height_breakpoint_px must be finite and >= 0, got {breakpoint}"
            ));
        }
        if self.remote.endpoint.is_empty() {
            errors.push("remote.endpoint must not be empty".to_owned());
        }

        errors
    }
}

/// Names of the two independent persistent entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub order_key: String,
    pub hidden_key: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            order_key: "canteen-order".to_owned(),
            hidden_key: "hidden-canteens".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Below this viewport width, item heights are left to auto layout.
    pub height_breakpoint_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            height_breakpoint_px: 768.0,
        }
    }
}

/// Form contract of the configuration write endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub token_field: String,
    pub order_field: String,
    pub hidden_field: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: "/canteen/preferences/".to_owned(),
            token_field: "csrfmiddlewaretoken".to_owned(),
            order_field: "canteen_order".to_owned(),
            hidden_field: "hidden_canteens".to_owned(),
        }
    }
}
