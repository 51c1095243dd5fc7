#![forbid(unsafe_code)]

//! The document seam.
//!
//! [`DocumentAdapter`] is everything the preference logic needs from the
//! rendered page. The wasm frontend implements it over `web-sys`; tests use
//! `testing::FakeDocument` (behind the `test-helpers` feature).

use crate::config::SectionId;
use crate::ids::ItemId;

/// One of the two per-item reordering affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveControl {
    Up,
    Down,
}

/// Server-rendered preference data embedded in the page.
///
/// Lists are the raw comma-joined strings; `None` means the attribute was not
/// rendered at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePayload {
    pub authenticated: bool,
    pub config_available: bool,
    pub ordering: Option<String>,
    pub hidden: Option<String>,
}

/// Capability interface over the rendered document.
pub trait DocumentAdapter {
    /// Identifiers of every item node across all sections, in document
    /// order. Repeats are expected (one node per section).
    fn scan_items(&self) -> Vec<ItemId>;

    /// Relink the node of `item` in `section` directly after the node of
    /// `predecessor`. Missing nodes are ignored.
    fn reposition_after(&mut self, section: SectionId, item: ItemId, predecessor: ItemId);

    /// Show or hide every node of `item`, in all sections.
    fn set_visible(&mut self, item: ItemId, visible: bool);

    /// Show or hide the `control` affordance of `item`.
    fn set_control_enabled(&mut self, item: ItemId, control: MoveControl, enabled: bool);

    /// Hide every move affordance on the page.
    fn hide_all_move_controls(&mut self);

    /// Toggle the "show hidden items" control.
    fn set_reveal_control_visible(&mut self, visible: bool);

    /// Current viewport width in CSS pixels.
    fn viewport_width(&self) -> f64;

    /// Natural (auto layout) height of each rendered instance of `item`.
    fn natural_heights(&mut self, item: ItemId) -> Vec<f64>;

    /// Pin every instance of `item` to `height`, or clear the explicit
    /// height with `None`.
    fn set_item_height(&mut self, item: ItemId, height: Option<f64>);

    /// Preference data the server rendered into the page.
    fn embedded_payload(&self) -> PagePayload;
}
