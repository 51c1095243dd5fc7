#![forbid(unsafe_code)]

//! `web-sys` implementations of the core seams: the rendered document and
//! `window.localStorage`.

use mensa_core::config::SectionId;
use mensa_core::{DocumentAdapter, ItemId, KeyValueStore, MoveControl, PagePayload, PrefsError};
use tracing::trace;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Storage, Window};

use crate::markup::{MarkupConfig, parse_flag};

fn for_each_match(document: &Document, selector: &str, mut f: impl FnMut(&HtmlElement)) {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return;
    };
    for index in 0..nodes.length() {
        if let Some(element) = nodes
            .item(index)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        {
            f(&element);
        }
    }
}

fn set_shown(element: &HtmlElement, shown: bool) {
    let style = element.style();
    let _ = if shown {
        style.remove_property("display").map(drop)
    } else {
        style.set_property("display", "none")
    };
}

/// The live page, addressed through [`MarkupConfig`] naming.
pub struct DomDocument {
    window: Window,
    document: Document,
    markup: MarkupConfig,
    sections: Vec<SectionId>,
}

impl DomDocument {
    /// `None` when there is no window or document (worker contexts).
    pub fn from_window(markup: MarkupConfig, sections: Vec<SectionId>) -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            markup,
            sections,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Request-forgery token from the configured cookie.
    pub fn csrf_token(&self) -> Option<String> {
        let cookies = self
            .document
            .dyn_ref::<web_sys::HtmlDocument>()?
            .cookie()
            .ok()?;
        crate::markup::cookie_value(&cookies, &self.markup.csrf_cookie)
    }

    fn node(&self, section: SectionId, item: ItemId) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(&self.markup.node_id(section, item))?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn payload_element(&self) -> Option<Element> {
        self.document.get_element_by_id(&self.markup.payload_element_id)
    }
}

impl DocumentAdapter for DomDocument {
    fn scan_items(&self) -> Vec<ItemId> {
        let mut ids = Vec::new();
        let Ok(nodes) = self.document.query_selector_all(&self.markup.items_selector()) else {
            return ids;
        };
        for index in 0..nodes.length() {
            let Some(element) = nodes
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            let raw = element.get_attribute(&self.markup.id_attribute);
            match raw.as_deref().and_then(ItemId::parse) {
                Some(id) => ids.push(id),
                None => trace!(
                    target: "mensa_web::dom",
                    index,
                    raw = raw.as_deref().unwrap_or(""),
                    "item node without a numeric id"
                ),
            }
        }
        ids
    }

    fn reposition_after(&mut self, section: SectionId, item: ItemId, predecessor: ItemId) {
        let (Some(node), Some(anchor)) = (self.node(section, item), self.node(section, predecessor))
        else {
            return;
        };
        let Some(parent) = anchor.parent_node() else {
            return;
        };
        let next = anchor.next_sibling();
        let _ = parent.insert_before(&node, next.as_ref());
    }

    fn set_visible(&mut self, item: ItemId, visible: bool) {
        for_each_match(&self.document, &self.markup.item_selector(item), |element| {
            set_shown(element, visible);
        });
    }

    fn set_control_enabled(&mut self, item: ItemId, control: MoveControl, enabled: bool) {
        let selector = self.markup.control_selector(item, control);
        for_each_match(&self.document, &selector, |element| {
            set_shown(element, enabled);
        });
    }

    fn hide_all_move_controls(&mut self) {
        for_each_match(&self.document, &self.markup.move_controls_selector(), |element| {
            set_shown(element, false);
        });
    }

    fn set_reveal_control_visible(&mut self, visible: bool) {
        if let Some(element) = self
            .document
            .get_element_by_id(&self.markup.reveal_control_id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        {
            set_shown(&element, visible);
        }
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0)
    }

    fn natural_heights(&mut self, item: ItemId) -> Vec<f64> {
        self.sections
            .iter()
            .filter_map(|&section| self.node(section, item))
            .map(|node| {
                let _ = node.style().remove_property("height");
                f64::from(node.offset_height())
            })
            .collect()
    }

    fn set_item_height(&mut self, item: ItemId, height: Option<f64>) {
        for &section in &self.sections {
            let Some(node) = self.node(section, item) else {
                continue;
            };
            let style = node.style();
            let _ = match height {
                Some(height) => style.set_property("height", &format!("{height}px")),
                None => style.remove_property("height").map(drop),
            };
        }
    }

    fn embedded_payload(&self) -> PagePayload {
        let Some(element) = self.payload_element() else {
            return PagePayload::default();
        };
        let markup = &self.markup;
        PagePayload {
            authenticated: parse_flag(
                element
                    .get_attribute(&markup.authenticated_attribute)
                    .as_deref(),
            ),
            config_available: parse_flag(
                element
                    .get_attribute(&markup.config_available_attribute)
                    .as_deref(),
            ),
            ordering: element.get_attribute(&markup.ordering_attribute),
            hidden: element.get_attribute(&markup.hidden_attribute),
        }
    }
}

/// `window.localStorage`.
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// `None` when storage is missing or access throws (privacy modes).
    pub fn from_window(window: &Window) -> Option<Self> {
        let storage = window.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| PrefsError::StorageWrite {
                key: key.to_owned(),
                reason: err.as_string().unwrap_or_else(|| format!("{err:?}")),
            })
    }
}
