#![forbid(unsafe_code)]

//! Projection of the preference pair onto the document.
//!
//! Nodes are relinked in place, never recreated. Every section is processed
//! independently, so all sections end up in the same relative order.

use tracing::trace;

use crate::config::{PrefsConfig, SectionId};
use crate::document::{DocumentAdapter, MoveControl};
use crate::ids::{HiddenSet, ItemId, ItemOrder};

/// Stateless renderer parameterised by section layout and breakpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRenderer {
    sections: Vec<SectionId>,
    height_breakpoint_px: f64,
}

impl ViewRenderer {
    #[must_use]
    pub fn new(sections: Vec<SectionId>, height_breakpoint_px: f64) -> Self {
        Self {
            sections,
            height_breakpoint_px,
        }
    }

    #[must_use]
    pub fn from_config(config: &PrefsConfig) -> Self {
        Self::new(config.sections.clone(), config.layout.height_breakpoint_px)
    }

    /// Full re-projection: order, visibility, affordances, heights.
    pub fn apply<D: DocumentAdapter + ?Sized>(
        &self,
        document: &mut D,
        ordering: &ItemOrder,
        hidden: &HiddenSet,
    ) {
        self.reposition(document, ordering);

        for id in hidden {
            document.set_visible(id, false);
        }
        for id in ordering {
            document.set_visible(id, true);
        }

        update_edge_controls(document, ordering);
        document.set_reveal_control_visible(!hidden.is_empty());

        self.sync_heights(document, ordering.iter().chain(hidden.iter()));

        trace!(
            target: "mensa_core::render",
            sections = self.sections.len(),
            ordering_len = ordering.len(),
            hidden_len = hidden.len(),
            "applied preferences to document"
        );
    }

    /// Place every item directly behind its predecessor, per section.
    fn reposition<D: DocumentAdapter + ?Sized>(&self, document: &mut D, ordering: &ItemOrder) {
        let ids = ordering.as_slice();
        for &section in &self.sections {
            for pair in ids.windows(2) {
                document.reposition_after(section, pair[1], pair[0]);
            }
        }
    }

    /// Equalise item heights across sections, or release them on narrow
    /// viewports where sections stack vertically.
    ///
    /// Layout only; never touches persisted state.
    pub fn sync_heights<D, I>(&self, document: &mut D, items: I)
    where
        D: DocumentAdapter + ?Sized,
        I: IntoIterator<Item = ItemId>,
    {
        let width = document.viewport_width();
        if width < self.height_breakpoint_px {
            for id in items {
                document.set_item_height(id, None);
            }
            return;
        }
        for id in items {
            let tallest = document
                .natural_heights(id)
                .into_iter()
                .filter(|height| height.is_finite())
                .fold(None, |acc: Option<f64>, height| {
                    Some(acc.map_or(height, |current| current.max(height)))
                });
            if let Some(tallest) = tallest {
                document.set_item_height(id, Some(tallest));
            }
        }
    }

    /// Startup path for hosts without persistent storage: the controllers
    /// cannot do anything, so their affordances go away.
    pub fn hide_move_controls<D: DocumentAdapter + ?Sized>(&self, document: &mut D) {
        document.hide_all_move_controls();
    }
}

/// The first item cannot move up and the last cannot move down.
fn update_edge_controls<D: DocumentAdapter + ?Sized>(document: &mut D, ordering: &ItemOrder) {
    let last = ordering.len().saturating_sub(1);
    for (index, id) in ordering.iter().enumerate() {
        document.set_control_enabled(id, MoveControl::Up, index != 0);
        document.set_control_enabled(id, MoveControl::Down, index != last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDocument;
    use pretty_assertions::assert_eq;

    fn renderer() -> ViewRenderer {
        ViewRenderer::new(vec![0, 99], 768.0)
    }

    #[test]
    fn reorders_every_section() {
        let mut doc = FakeDocument::new(&[0, 99], &[3, 1, 4]);
        renderer().apply(&mut doc, &ItemOrder::from_ids([4, 3, 1]), &HiddenSet::new());
        assert_eq!(doc.section_order(0), vec![4, 3, 1]);
        assert_eq!(doc.section_order(99), vec![4, 3, 1]);
    }

    #[test]
    fn hidden_items_are_hidden_and_others_shown() {
        let mut doc = FakeDocument::new(&[0, 99], &[3, 1, 4]);
        doc.set_visible(ItemId::new(1), false);
        renderer().apply(&mut doc, &ItemOrder::from_ids([1, 4]), &HiddenSet::from_ids([3]));
        assert!(!doc.is_visible(3));
        assert!(doc.is_visible(1));
        assert!(doc.is_visible(4));
        assert!(doc.reveal_control_visible());
    }

    #[test]
    fn edge_controls_follow_ordering() {
        let mut doc = FakeDocument::new(&[0], &[3, 1, 4]);
        renderer().apply(&mut doc, &ItemOrder::from_ids([1, 3, 4]), &HiddenSet::new());
        assert!(!doc.control_enabled(1, MoveControl::Up));
        assert!(doc.control_enabled(1, MoveControl::Down));
        assert!(doc.control_enabled(3, MoveControl::Up));
        assert!(doc.control_enabled(3, MoveControl::Down));
        assert!(doc.control_enabled(4, MoveControl::Up));
        assert!(!doc.control_enabled(4, MoveControl::Down));
        assert!(!doc.reveal_control_visible());
    }

    #[test]
    fn single_item_has_no_move_controls() {
        let mut doc = FakeDocument::new(&[0], &[7]);
        renderer().apply(&mut doc, &ItemOrder::from_ids([7]), &HiddenSet::new());
        assert!(!doc.control_enabled(7, MoveControl::Up));
        assert!(!doc.control_enabled(7, MoveControl::Down));
    }

    #[test]
    fn wide_viewport_equalises_heights() {
        let mut doc = FakeDocument::new(&[0, 99], &[1, 2]);
        doc.set_natural_height(0, 1, 120.0);
        doc.set_natural_height(99, 1, 80.0);
        doc.set_natural_height(0, 2, 40.0);
        doc.set_natural_height(99, 2, 65.0);
        doc.set_viewport_width(1024.0);
        renderer().sync_heights(&mut doc, [ItemId::new(1), ItemId::new(2)]);
        assert_eq!(doc.explicit_height(1), Some(120.0));
        assert_eq!(doc.explicit_height(2), Some(65.0));
    }

    #[test]
    fn narrow_viewport_clears_heights() {
        let mut doc = FakeDocument::new(&[0, 99], &[1]);
        doc.set_item_height(ItemId::new(1), Some(50.0));
        doc.set_viewport_width(400.0);
        renderer().sync_heights(&mut doc, [ItemId::new(1)]);
        assert_eq!(doc.explicit_height(1), None);
    }
}
