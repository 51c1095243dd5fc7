#![forbid(unsafe_code)]

//! [`PreferenceSession`]: the page-lifetime state object.
//!
//! Built once at page initialization and owned by the host. It holds the
//! document adapter, the persistent state, the remote channel and the
//! renderer, and exposes the user operations as methods (see the `order`
//! and `visibility` modules for their implementations).
//!
//! The session owns the live preference pair. The key-value store is a
//! write-through mirror: it is read at construction and by the load
//! sequence, and written after every transition. A store that rejects
//! writes therefore loses persistence across reloads but never the state of
//! the current page.

use tracing::debug;

use crate::config::PrefsConfig;
use crate::document::DocumentAdapter;
use crate::ids::{HiddenSet, ItemOrder};
use crate::inventory;
use crate::reconcile::{reconcile, reconcile_lists};
use crate::remote::{PushTransport, RemoteState, RemoteSync};
use crate::render::ViewRenderer;
use crate::storage::{KeyValueStore, PersistentState};

/// Result of [`PreferenceSession::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub ordering: ItemOrder,
    pub hidden: HiddenSet,
    /// Server-held preferences replaced the local ones.
    pub pulled: bool,
    /// Persistent storage is available and the controllers are live.
    pub interactive: bool,
}

pub struct PreferenceSession<D, S, T> {
    pub(crate) document: D,
    pub(crate) state: PersistentState<S>,
    pub(crate) remote: RemoteSync<T>,
    pub(crate) renderer: ViewRenderer,
    pub(crate) ordering: ItemOrder,
    pub(crate) hidden: HiddenSet,
}

impl<D, S, T> PreferenceSession<D, S, T>
where
    D: DocumentAdapter,
    S: KeyValueStore,
    T: PushTransport,
{
    #[must_use]
    pub fn new(
        document: D,
        state: PersistentState<S>,
        remote: RemoteSync<T>,
        config: &PrefsConfig,
    ) -> Self {
        let ordering = state
            .load_ordering()
            .unwrap_or_else(|| ItemOrder::from(&inventory::scan(&document)));
        let hidden = state.load_hidden().unwrap_or_default();
        Self {
            document,
            state,
            remote,
            renderer: ViewRenderer::from_config(config),
            ordering,
            hidden,
        }
    }

    /// Page-load sequence: inventory, reconcile, pull, render once.
    pub fn load(&mut self) -> LoadOutcome {
        let snapshot = inventory::scan(&self.document);

        if !self.state.is_supported() {
            self.renderer.hide_move_controls(&mut self.document);
            self.renderer.sync_heights(&mut self.document, snapshot.iter());
            self.ordering = ItemOrder::from(&snapshot);
            self.hidden = HiddenSet::new();
            debug!(
                target: "mensa_core::session",
                items = snapshot.len(),
                "persistent storage unavailable; preferences disabled"
            );
            return LoadOutcome {
                ordering: self.ordering.clone(),
                hidden: HiddenSet::new(),
                pulled: false,
                interactive: false,
            };
        }

        let (mut ordering, mut hidden) = reconcile(&mut self.state, &snapshot);

        let payload = self.document.embedded_payload();
        let pulled = match self.remote.pull(&payload) {
            Some(RemoteState {
                ordering: mut pulled_ordering,
                hidden: mut pulled_hidden,
            }) => {
                let report = reconcile_lists(&snapshot, &mut pulled_ordering, &mut pulled_hidden);
                self.state.save_ordering(&pulled_ordering);
                self.state.save_hidden(&pulled_hidden);
                debug!(
                    target: "mensa_core::reconcile",
                    appended = report.appended,
                    pruned_ordering = report.pruned_ordering,
                    pruned_hidden = report.pruned_hidden,
                    deduplicated = report.deduplicated,
                    "reconciled pulled preferences"
                );
                (ordering, hidden) = (pulled_ordering, pulled_hidden);
                true
            }
            None => false,
        };

        self.renderer.apply(&mut self.document, &ordering, &hidden);
        debug!(
            target: "mensa_core::session",
            items = snapshot.len(),
            ordering_len = ordering.len(),
            hidden_len = hidden.len(),
            pulled,
            "preferences loaded"
        );
        self.ordering.clone_from(&ordering);
        self.hidden.clone_from(&hidden);

        LoadOutcome {
            ordering,
            hidden,
            pulled,
            interactive: true,
        }
    }

    /// Viewport changed: recompute the height alignment only.
    pub fn resize(&mut self) {
        let snapshot = inventory::scan(&self.document);
        self.renderer.sync_heights(&mut self.document, snapshot.iter());
    }

    /// Live ordering for this page.
    #[must_use]
    pub fn ordering(&self) -> ItemOrder {
        self.ordering.clone()
    }

    /// Live hidden set for this page.
    #[must_use]
    pub fn hidden(&self) -> HiddenSet {
        self.hidden.clone()
    }

    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    #[must_use]
    pub fn state(&self) -> &PersistentState<S> {
        &self.state
    }

    #[must_use]
    pub fn remote(&self) -> &RemoteSync<T> {
        &self.remote
    }
}
