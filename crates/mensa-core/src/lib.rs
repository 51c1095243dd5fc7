#![forbid(unsafe_code)]

//! `mensa-core` keeps a user's canteen display preferences consistent.
//!
//! # Role
//! The canteen page renders the same list of canteens once per day section.
//! Users reorder canteens one step at a time and hide ones they do not care
//! about. That preference lives in three places: the rendered document, the
//! browser's key-value store and (for signed-in users) the server. This crate
//! owns the logic that keeps those three convergent and re-projects the
//! preference onto the document on every load.
//!
//! # Components
//! - [`inventory::scan`]: baseline ids from the document.
//! - [`storage::PersistentState`]: typed access to the key-value store.
//! - [`reconcile::reconcile`]: heals stored state against the document.
//! - [`remote::RemoteSync`]: pull at load, fire-and-forget push on change.
//! - [`PreferenceSession::move_item`]: adjacent-swap reordering.
//! - [`PreferenceSession::hide`] / [`PreferenceSession::show_all`]: visibility.
//! - [`render::ViewRenderer`]: node relinking, visibility, affordances,
//!   height alignment.
//!
//! No JS/WASM types appear here; `mensa-web` supplies the browser-side
//! [`DocumentAdapter`], [`KeyValueStore`] and [`PushTransport`].

pub mod config;
pub mod document;
pub mod error;
pub mod ids;
pub mod inventory;
pub mod order;
pub mod reconcile;
pub mod remote;
pub mod render;
pub mod session;
pub mod storage;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
pub mod visibility;

pub use config::{PrefsConfig, SectionId};
pub use document::{DocumentAdapter, MoveControl, PagePayload};
pub use error::PrefsError;
pub use ids::{DomSnapshot, HiddenSet, ItemId, ItemOrder};
pub use order::MoveDirection;
pub use remote::{PushRequest, PushTransport, RemoteState, RemoteSync};
pub use session::{LoadOutcome, PreferenceSession};
pub use storage::{KeyValueStore, MemoryStore, PersistentState};
