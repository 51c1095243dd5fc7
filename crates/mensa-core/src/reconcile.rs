#![forbid(unsafe_code)]

//! Integrity reconciliation between persisted preferences and the document.
//!
//! After [`reconcile`] returns, the persisted pair satisfies:
//! - ordering and hidden set are disjoint,
//! - their union equals the snapshot,
//! - neither contains duplicates.

use tracing::debug;

use crate::ids::{DomSnapshot, HiddenSet, ItemOrder};
use crate::storage::{KeyValueStore, PersistentState};

/// What a reconciliation pass changed, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Ordering was absent or unreadable and got seeded from the snapshot.
    pub seeded_ordering: bool,
    /// Items present in the snapshot but in neither list.
    pub appended: usize,
    /// Ordering entries no longer rendered.
    pub pruned_ordering: usize,
    /// Hidden entries no longer rendered.
    pub pruned_hidden: usize,
    /// Ordering entries dropped because they are also hidden.
    pub deduplicated: usize,
}

impl ReconcileReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Bring `ordering`/`hidden` in line with `snapshot` without touching storage.
///
/// Survivors keep their relative order; newly rendered items are appended to
/// the ordering (visible, lowest priority).
pub fn reconcile_lists(
    snapshot: &DomSnapshot,
    ordering: &mut ItemOrder,
    hidden: &mut HiddenSet,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    let before = ordering.len();
    ordering.retain(|id| !hidden.contains(id));
    report.deduplicated = before - ordering.len();

    for id in snapshot {
        if !ordering.contains(id) && !hidden.contains(id) {
            ordering.push(id);
            report.appended += 1;
        }
    }

    let before = ordering.len();
    ordering.retain(|id| snapshot.contains(id));
    report.pruned_ordering = before - ordering.len();

    let before = hidden.len();
    hidden.retain(|id| snapshot.contains(id));
    report.pruned_hidden = before - hidden.len();

    report
}

/// Load, repair and persist the preference pair.
///
/// Both entries are written back even when nothing changed, which heals a
/// corrupt entry that merely read as absent.
pub fn reconcile<S: KeyValueStore>(
    state: &mut PersistentState<S>,
    snapshot: &DomSnapshot,
) -> (ItemOrder, HiddenSet) {
    let stored = state.load_ordering();
    let seeded_ordering = stored.is_none();
    let mut ordering = stored.unwrap_or_else(|| ItemOrder::from(snapshot));
    let mut hidden = state.load_hidden().unwrap_or_default();

    let mut report = reconcile_lists(snapshot, &mut ordering, &mut hidden);
    report.seeded_ordering = seeded_ordering;

    state.save_ordering(&ordering);
    state.save_hidden(&hidden);

    debug!(
        target: "mensa_core::reconcile",
        snapshot_len = snapshot.len(),
        ordering_len = ordering.len(),
        hidden_len = hidden.len(),
        seeded = report.seeded_ordering,
        appended = report.appended,
        pruned_ordering = report.pruned_ordering,
        pruned_hidden = report.pruned_hidden,
        deduplicated = report.deduplicated,
        "reconciled persisted preferences"
    );

    (ordering, hidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageKeys;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn state_with(order: Option<&str>, hidden: Option<&str>) -> PersistentState<MemoryStore> {
        let mut store = MemoryStore::new();
        if let Some(order) = order {
            store = store.with_entry("canteen-order", order);
        }
        if let Some(hidden) = hidden {
            store = store.with_entry("hidden-canteens", hidden);
        }
        PersistentState::new(store, StorageKeys::default())
    }

    #[test]
    fn seeds_from_snapshot_when_nothing_is_stored() {
        let mut state = state_with(None, None);
        let (ordering, hidden) = reconcile(&mut state, &DomSnapshot::from_ids([3, 1, 4]));
        assert_eq!(ordering, ItemOrder::from_ids([3, 1, 4]));
        assert!(hidden.is_empty());
        assert_eq!(state.load_ordering(), Some(ordering));
        assert_eq!(state.load_hidden(), Some(HiddenSet::new()));
    }

    #[test]
    fn prunes_removed_and_appends_new_items() {
        let mut state = state_with(Some("[5,9]"), None);
        let (ordering, hidden) = reconcile(&mut state, &DomSnapshot::from_ids([9, 7]));
        assert_eq!(ordering, ItemOrder::from_ids([9, 7]));
        assert!(hidden.is_empty());
    }

    #[test]
    fn hidden_items_are_not_reappended() {
        let mut state = state_with(Some("[1]"), Some("[2]"));
        let (ordering, hidden) = reconcile(&mut state, &DomSnapshot::from_ids([1, 2, 3]));
        assert_eq!(ordering, ItemOrder::from_ids([1, 3]));
        assert_eq!(hidden, HiddenSet::from_ids([2]));
    }

    #[test]
    fn hidden_set_is_pruned_against_snapshot() {
        let mut state = state_with(Some("[1]"), Some("[5,2]"));
        let (_, hidden) = reconcile(&mut state, &DomSnapshot::from_ids([1, 2]));
        assert_eq!(hidden, HiddenSet::from_ids([2]));
        assert_eq!(state.load_hidden(), Some(HiddenSet::from_ids([2])));
    }

    #[test]
    fn corrupt_ordering_is_healed() {
        let mut state = state_with(Some("not json"), Some("[4]"));
        let (ordering, hidden) = reconcile(&mut state, &DomSnapshot::from_ids([3, 4, 5]));
        assert_eq!(ordering, ItemOrder::from_ids([3, 5]));
        assert_eq!(hidden, HiddenSet::from_ids([4]));
        assert_eq!(state.load_ordering(), Some(ItemOrder::from_ids([3, 5])));
    }

    #[test]
    fn overlap_resolves_in_favour_of_hidden() {
        let mut ordering = ItemOrder::from_ids([1, 2, 3]);
        let mut hidden = HiddenSet::from_ids([2]);
        let report =
            reconcile_lists(&DomSnapshot::from_ids([1, 2, 3]), &mut ordering, &mut hidden);
        assert_eq!(ordering, ItemOrder::from_ids([1, 3]));
        assert_eq!(report.deduplicated, 1);
    }

    #[test]
    fn pruning_keeps_relative_order() {
        let mut ordering = ItemOrder::from_ids([8, 2, 6, 4]);
        let mut hidden = HiddenSet::new();
        let report =
            reconcile_lists(&DomSnapshot::from_ids([4, 6, 8]), &mut ordering, &mut hidden);
        assert_eq!(ordering, ItemOrder::from_ids([8, 6, 4]));
        assert_eq!(report.pruned_ordering, 1);
        assert_eq!(report.appended, 0);
    }

    #[test]
    fn consistent_state_reports_clean() {
        let mut ordering = ItemOrder::from_ids([2, 1]);
        let mut hidden = HiddenSet::from_ids([3]);
        let report =
            reconcile_lists(&DomSnapshot::from_ids([1, 2, 3]), &mut ordering, &mut hidden);
        assert!(report.is_clean());
    }
}
