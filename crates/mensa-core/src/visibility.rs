#![forbid(unsafe_code)]

//! Hide / show-all transitions between the ordering and the hidden set.

use tracing::debug;

use crate::document::DocumentAdapter;
use crate::ids::{HiddenSet, ItemId, ItemOrder};
use crate::remote::PushTransport;
use crate::session::PreferenceSession;
use crate::storage::KeyValueStore;

/// Move `id` from `ordering` to the end of `hidden`.
///
/// Returns `false` without touching either list when `id` is already hidden
/// or not part of the ordering.
pub fn hide_in(ordering: &mut ItemOrder, hidden: &mut HiddenSet, id: ItemId) -> bool {
    if hidden.contains(id) || !ordering.contains(id) {
        return false;
    }
    ordering.remove(id);
    hidden.push(id);
    true
}

/// Append every hidden id to `ordering`, in hidden order, and clear `hidden`.
///
/// Returns how many ids were restored.
pub fn restore_all(ordering: &mut ItemOrder, hidden: &mut HiddenSet) -> usize {
    let restored = hidden.len();
    for id in hidden.iter() {
        ordering.push(id);
    }
    hidden.clear();
    restored
}

impl<D, S, T> PreferenceSession<D, S, T>
where
    D: DocumentAdapter,
    S: KeyValueStore,
    T: PushTransport,
{
    /// Hide `id` in every section.
    ///
    /// Returns `true` when nothing happened: the id was already hidden, is
    /// unknown, or the host cannot persist preferences. Returns `false` after
    /// an actual transition.
    pub fn hide(&mut self, id: ItemId) -> bool {
        if !self.state.is_supported() {
            return true;
        }
        if !hide_in(&mut self.ordering, &mut self.hidden, id) {
            return true;
        }

        self.state.save_hidden(&self.hidden);
        self.state.save_ordering(&self.ordering);
        self.renderer.apply(&mut self.document, &self.ordering, &self.hidden);
        self.remote.push(&self.ordering, &self.hidden);

        debug!(
            target: "mensa_core::visibility",
            item = %id,
            hidden_len = self.hidden.len(),
            "hid item"
        );
        false
    }

    /// Restore every hidden item to the end of the ordering.
    ///
    /// Returns the resulting ordering. With nothing hidden this is a no-op:
    /// no write, no render and no push.
    pub fn show_all(&mut self) -> ItemOrder {
        if !self.state.is_supported() || self.hidden.is_empty() {
            return self.ordering.clone();
        }

        let restored = restore_all(&mut self.ordering, &mut self.hidden);
        self.state.save_ordering(&self.ordering);
        self.state.save_hidden(&self.hidden);
        self.renderer.apply(&mut self.document, &self.ordering, &self.hidden);
        self.remote.push(&self.ordering, &self.hidden);

        debug!(
            target: "mensa_core::visibility",
            restored,
            ordering_len = self.ordering.len(),
            "restored hidden items"
        );
        self.ordering.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hide_moves_id_between_lists() {
        let mut ordering = ItemOrder::from_ids([1, 3, 4]);
        let mut hidden = HiddenSet::new();
        assert!(hide_in(&mut ordering, &mut hidden, ItemId::new(3)));
        assert_eq!(ordering, ItemOrder::from_ids([1, 4]));
        assert_eq!(hidden, HiddenSet::from_ids([3]));
    }

    #[test]
    fn hide_rejects_hidden_and_unknown_ids() {
        let mut ordering = ItemOrder::from_ids([1, 4]);
        let mut hidden = HiddenSet::from_ids([3]);
        assert!(!hide_in(&mut ordering, &mut hidden, ItemId::new(3)));
        assert!(!hide_in(&mut ordering, &mut hidden, ItemId::new(8)));
        assert_eq!(ordering, ItemOrder::from_ids([1, 4]));
        assert_eq!(hidden, HiddenSet::from_ids([3]));
    }

    #[test]
    fn restore_appends_in_hidden_order() {
        let mut ordering = ItemOrder::from_ids([1]);
        let mut hidden = HiddenSet::from_ids([4, 3]);
        assert_eq!(restore_all(&mut ordering, &mut hidden), 2);
        assert_eq!(ordering, ItemOrder::from_ids([1, 4, 3]));
        assert!(hidden.is_empty());
    }
}
