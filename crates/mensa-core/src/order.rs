#![forbid(unsafe_code)]

//! Adjacent-swap reordering.
//!
//! Moving one step is the only reordering primitive; there is no
//! absolute-position operation. `Up` then `Down` on the same id restores the
//! original permutation unless the first move was a no-op.

use tracing::{debug, trace};

use crate::document::DocumentAdapter;
use crate::ids::{ItemId, ItemOrder};
use crate::remote::PushTransport;
use crate::session::PreferenceSession;
use crate::storage::KeyValueStore;

/// Direction of a single reorder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    /// Map the page's `-1`/`+1` convention. Zero is not a direction.
    #[must_use]
    pub const fn from_step(step: i32) -> Option<Self> {
        if step < 0 {
            Some(Self::Up)
        } else if step > 0 {
            Some(Self::Down)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Swap `id` with its neighbour in `direction`.
///
/// Returns `false`, leaving `ordering` untouched, when `id` is unknown or
/// already at the relevant end.
pub fn swap_adjacent(ordering: &mut ItemOrder, direction: MoveDirection, id: ItemId) -> bool {
    let Some(index) = ordering.position(id) else {
        return false;
    };
    let neighbour = match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => Some(index + 1).filter(|&next| next < ordering.len()),
    };
    let Some(neighbour) = neighbour else {
        return false;
    };
    ordering.swap(index, neighbour);
    true
}

impl<D, S, T> PreferenceSession<D, S, T>
where
    D: DocumentAdapter,
    S: KeyValueStore,
    T: PushTransport,
{
    /// Move `id` one step in `direction`.
    ///
    /// On success the ordering is persisted, the document re-rendered and the
    /// new state pushed. A no-op move has no side effects at all.
    pub fn move_item(&mut self, direction: MoveDirection, id: ItemId) -> bool {
        if !self.state.is_supported() {
            return false;
        }
        if !swap_adjacent(&mut self.ordering, direction, id) {
            trace!(target: "mensa_core::order", item = %id, ?direction, "move rejected");
            return false;
        }

        self.state.save_ordering(&self.ordering);
        self.renderer.apply(&mut self.document, &self.ordering, &self.hidden);
        self.remote.push(&self.ordering, &self.hidden);

        debug!(
            target: "mensa_core::order",
            item = %id,
            ?direction,
            index = self.ordering.position(id).unwrap_or_default(),
            "moved item"
        );
        true
    }
}
