#![forbid(unsafe_code)]

//! Naming rules of the server-rendered canteen markup.
//!
//! Target-independent so the selector and payload conventions are testable
//! natively; the wasm adapter only ever builds selectors through here.

use mensa_core::config::SectionId;
use mensa_core::{ItemId, MoveControl, PrefsConfig, PrefsError};
use serde::{Deserialize, Serialize};

/// Class names, ids and attributes the page template renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Class carried by every item node.
    pub item_class: String,
    /// Attribute holding the numeric item id.
    pub id_attribute: String,
    /// Node ids are `{prefix}-{section}-{item}`; the per-item visibility
    /// class is `{prefix}-{item}`.
    pub node_id_prefix: String,
    pub move_control_class: String,
    pub up_control_prefix: String,
    pub down_control_prefix: String,
    pub reveal_control_id: String,
    /// Element carrying the embedded server payload as data attributes.
    pub payload_element_id: String,
    pub authenticated_attribute: String,
    pub config_available_attribute: String,
    pub ordering_attribute: String,
    pub hidden_attribute: String,
    /// Cookie holding the request-forgery token.
    pub csrf_cookie: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            item_class: "canteen".to_owned(),
            id_attribute: "data-canteennumber".to_owned(),
            node_id_prefix: "canteen".to_owned(),
            move_control_class: "move-link".to_owned(),
            up_control_prefix: "up-".to_owned(),
            down_control_prefix: "down-".to_owned(),
            reveal_control_id: "showHiddenCanteensLink".to_owned(),
            payload_element_id: "canteen-preferences".to_owned(),
            authenticated_attribute: "data-authenticated".to_owned(),
            config_available_attribute: "data-config-available".to_owned(),
            ordering_attribute: "data-canteen-order".to_owned(),
            hidden_attribute: "data-hidden-canteens".to_owned(),
            csrf_cookie: "csrftoken".to_owned(),
        }
    }
}

impl MarkupConfig {
    /// DOM id of one item node.
    #[must_use]
    pub fn node_id(&self, section: SectionId, item: ItemId) -> String {
        format!("{}-{section}-{item}", self.node_id_prefix)
    }

    #[must_use]
    pub fn items_selector(&self) -> String {
        format!(".{}", self.item_class)
    }

    /// Every node of `item`, across sections.
    #[must_use]
    pub fn item_selector(&self, item: ItemId) -> String {
        format!(".{}-{item}", self.node_id_prefix)
    }

    #[must_use]
    pub fn control_selector(&self, item: ItemId, control: MoveControl) -> String {
        let prefix = match control {
            MoveControl::Up => &self.up_control_prefix,
            MoveControl::Down => &self.down_control_prefix,
        };
        format!(".{prefix}{item}")
    }

    #[must_use]
    pub fn move_controls_selector(&self) -> String {
        format!(".{}", self.move_control_class)
    }

    fn validate(&self) -> Vec<String> {
        let required = [
            ("markup.item_class", &self.item_class),
            ("markup.id_attribute", &self.id_attribute),
            ("markup.node_id_prefix", &self.node_id_prefix),
            ("markup.move_control_class", &self.move_control_class),
            ("markup.payload_element_id", &self.payload_element_id),
        ];
        required
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| format!("{name} must not be empty"))
            .collect()
    }
}

/// Host configuration: core preferences plus markup naming.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub prefs: PrefsConfig,
    pub markup: MarkupConfig,
}

impl WebConfig {
    pub fn from_json_str(s: &str) -> Result<Self, PrefsError> {
        let config: Self = serde_json::from_str(s)?;
        let mut errors = config.prefs.validate();
        errors.extend(config.markup.validate());
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(PrefsError::Validation(errors))
        }
    }
}

/// Server-rendered boolean attribute (`"true"`, `"True"`, `"1"`).
#[must_use]
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(str::trim),
        Some(value) if value == "1" || value.eq_ignore_ascii_case("true")
    )
}

/// Look up `name` in a `document.cookie` string.
#[must_use]
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selectors_follow_template_naming() {
        let markup = MarkupConfig::default();
        let item = ItemId::new(12);
        assert_eq!(markup.node_id(99, item), "canteen-99-12");
        assert_eq!(markup.items_selector(), ".canteen");
        assert_eq!(markup.item_selector(item), ".canteen-12");
        assert_eq!(markup.control_selector(item, MoveControl::Up), ".up-12");
        assert_eq!(markup.control_selector(item, MoveControl::Down), ".down-12");
        assert_eq!(markup.move_controls_selector(), ".move-link");
    }

    #[test]
    fn flags() {
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some("True")));
        assert!(parse_flag(Some(" 1 ")));
        assert!(!parse_flag(Some("false")));
        assert!(!parse_flag(Some("")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn cookie_lookup() {
        let cookies = "sessionid=abc; csrftoken=tok=en; theme=dark";
        assert_eq!(cookie_value(cookies, "csrftoken").as_deref(), Some("tok=en"));
        assert_eq!(cookie_value(cookies, "missing"), None);
        assert_eq!(cookie_value("", "csrftoken"), None);
    }

    #[test]
    fn web_config_defaults_and_validation() {
        let config = WebConfig::from_json_str("{}").unwrap();
        assert_eq!(config, WebConfig::default());

        let config =
            WebConfig::from_json_str(r#"{"markup":{"item_class":"mensa"},"prefs":{"sections":[1]}}"#)
                .unwrap();
        assert_eq!(config.markup.items_selector(), ".mensa");
        assert_eq!(config.prefs.sections, vec![1]);

        let err = WebConfig::from_json_str(r#"{"markup":{"node_id_prefix":""}}"#).unwrap_err();
        assert!(matches!(err, PrefsError::Validation(ref e) if e.len() == 1), "{err}");
    }
}
