#![forbid(unsafe_code)]

//! In-memory collaborators for tests: a document model and a push recorder.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::SectionId;
use crate::document::{DocumentAdapter, MoveControl, PagePayload};
use crate::ids::ItemId;
use crate::remote::{PushRequest, PushTransport};

/// Document with one node per (section, item), kept as ordered lists.
#[derive(Debug, Clone)]
pub struct FakeDocument {
    sections: BTreeMap<SectionId, Vec<ItemId>>,
    section_order: Vec<SectionId>,
    hidden: HashSet<ItemId>,
    controls: HashMap<(ItemId, MoveControl), bool>,
    reveal_visible: bool,
    viewport_width: f64,
    natural_heights: HashMap<(SectionId, ItemId), f64>,
    explicit_heights: HashMap<ItemId, f64>,
    payload: PagePayload,
    mutations: usize,
}

impl FakeDocument {
    /// Every section renders `items` in the given order.
    #[must_use]
    pub fn new(sections: &[SectionId], items: &[i64]) -> Self {
        let ids: Vec<ItemId> = items.iter().copied().map(ItemId::new).collect();
        Self {
            sections: sections.iter().map(|&s| (s, ids.clone())).collect(),
            section_order: sections.to_vec(),
            hidden: HashSet::new(),
            controls: HashMap::new(),
            reveal_visible: false,
            viewport_width: 1024.0,
            natural_heights: HashMap::new(),
            explicit_heights: HashMap::new(),
            payload: PagePayload::default(),
            mutations: 0,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: PagePayload) -> Self {
        self.payload = payload;
        self
    }

    /// Append a node for `item` to the end of `section`.
    pub fn add_node(&mut self, section: SectionId, item: i64) {
        if !self.section_order.contains(&section) {
            self.section_order.push(section);
        }
        self.sections
            .entry(section)
            .or_default()
            .push(ItemId::new(item));
    }

    /// Drop every node of `item`.
    pub fn remove_item(&mut self, item: i64) {
        for nodes in self.sections.values_mut() {
            nodes.retain(|id| id.get() != item);
        }
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn set_natural_height(&mut self, section: SectionId, item: i64, height: f64) {
        self.natural_heights
            .insert((section, ItemId::new(item)), height);
    }

    #[must_use]
    pub fn section_order(&self, section: SectionId) -> Vec<i64> {
        self.sections
            .get(&section)
            .map(|nodes| nodes.iter().map(|id| id.get()).collect())
            .unwrap_or_default()
    }

    /// Ids in `section` that are currently shown.
    #[must_use]
    pub fn visible_order(&self, section: SectionId) -> Vec<i64> {
        self.section_order(section)
            .into_iter()
            .filter(|&id| self.is_visible(id))
            .collect()
    }

    #[must_use]
    pub fn is_visible(&self, item: i64) -> bool {
        !self.hidden.contains(&ItemId::new(item))
    }

    /// Controls start out enabled, as in the server-rendered markup.
    #[must_use]
    pub fn control_enabled(&self, item: i64, control: MoveControl) -> bool {
        self.controls
            .get(&(ItemId::new(item), control))
            .copied()
            .unwrap_or(true)
    }

    #[must_use]
    pub fn reveal_control_visible(&self) -> bool {
        self.reveal_visible
    }

    #[must_use]
    pub fn explicit_height(&self, item: i64) -> Option<f64> {
        self.explicit_heights.get(&ItemId::new(item)).copied()
    }

    /// Number of mutating adapter calls so far.
    #[must_use]
    pub fn mutations(&self) -> usize {
        self.mutations
    }
}

impl DocumentAdapter for FakeDocument {
    fn scan_items(&self) -> Vec<ItemId> {
        self.section_order
            .iter()
            .filter_map(|section| self.sections.get(section))
            .flatten()
            .copied()
            .collect()
    }

    fn reposition_after(&mut self, section: SectionId, item: ItemId, predecessor: ItemId) {
        self.mutations += 1;
        let Some(nodes) = self.sections.get_mut(&section) else {
            return;
        };
        if item == predecessor || !nodes.contains(&predecessor) {
            return;
        }
        let Some(from) = nodes.iter().position(|&id| id == item) else {
            return;
        };
        nodes.remove(from);
        let anchor = nodes
            .iter()
            .position(|&id| id == predecessor)
            .map_or(nodes.len(), |index| index + 1);
        nodes.insert(anchor, item);
    }

    fn set_visible(&mut self, item: ItemId, visible: bool) {
        self.mutations += 1;
        if visible {
            self.hidden.remove(&item);
        } else {
            self.hidden.insert(item);
        }
    }

    fn set_control_enabled(&mut self, item: ItemId, control: MoveControl, enabled: bool) {
        self.mutations += 1;
        self.controls.insert((item, control), enabled);
    }

    fn hide_all_move_controls(&mut self) {
        self.mutations += 1;
        let items: Vec<ItemId> = self.scan_items();
        for item in items {
            self.controls.insert((item, MoveControl::Up), false);
            self.controls.insert((item, MoveControl::Down), false);
        }
    }

    fn set_reveal_control_visible(&mut self, visible: bool) {
        self.mutations += 1;
        self.reveal_visible = visible;
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn natural_heights(&mut self, item: ItemId) -> Vec<f64> {
        self.section_order
            .iter()
            .filter(|section| {
                self.sections
                    .get(*section)
                    .is_some_and(|nodes| nodes.contains(&item))
            })
            .map(|&section| {
                self.natural_heights
                    .get(&(section, item))
                    .copied()
                    .unwrap_or(0.0)
            })
            .collect()
    }

    fn set_item_height(&mut self, item: ItemId, height: Option<f64>) {
        self.mutations += 1;
        match height {
            Some(height) => self.explicit_heights.insert(item, height),
            None => self.explicit_heights.remove(&item),
        };
    }

    fn embedded_payload(&self) -> PagePayload {
        self.payload.clone()
    }
}

/// Transport that records every request instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: RefCell<Vec<PushRequest>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn sent(&self) -> Vec<PushRequest> {
        self.sent.borrow().clone()
    }
}

impl PushTransport for RecordingTransport {
    fn dispatch(&self, request: PushRequest) {
        self.sent.borrow_mut().push(request);
    }
}
