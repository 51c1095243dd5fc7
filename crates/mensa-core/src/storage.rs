#![forbid(unsafe_code)]

//! Typed access to the browser-resident key-value store.
//!
//! Two independent entries hold the JSON-encoded [`ItemOrder`] and
//! [`HiddenSet`]. Missing and malformed values read as absent; writes replace
//! the whole entry. Without a store every read is absent and every write is
//! dropped.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use crate::config::StorageKeys;
use crate::error::PrefsError;
use crate::ids::{HiddenSet, ItemOrder};

/// Minimal string key-value capability (`localStorage` shaped).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// In-process store for native hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing serialization.
    #[must_use]
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Typed accessor over an optional [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct PersistentState<S> {
    store: Option<S>,
    keys: StorageKeys,
}

impl<S: KeyValueStore> PersistentState<S> {
    #[must_use]
    pub fn new(store: S, keys: StorageKeys) -> Self {
        Self {
            store: Some(store),
            keys,
        }
    }

    /// State for a host without persistent storage.
    #[must_use]
    pub fn unsupported(keys: StorageKeys) -> Self {
        Self { store: None, keys }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.store.is_some()
    }

    #[must_use]
    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    pub fn load_ordering(&self) -> Option<ItemOrder> {
        self.load(&self.keys.order_key)
    }

    pub fn load_hidden(&self) -> Option<HiddenSet> {
        self.load(&self.keys.hidden_key)
    }

    pub fn save_ordering(&mut self, ordering: &ItemOrder) {
        let key = self.keys.order_key.clone();
        self.save(&key, ordering);
    }

    pub fn save_hidden(&mut self, hidden: &HiddenSet) {
        let key = self.keys.hidden_key.clone();
        self.save(&key, hidden);
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.as_ref()?.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    target: "mensa_core::storage",
                    key,
                    error = %err,
                    "ignoring malformed persisted value"
                );
                None
            }
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(target: "mensa_core::storage", key, error = %err, "failed to encode value");
                return;
            }
        };
        match store.set(key, &encoded) {
            Ok(()) => trace!(target: "mensa_core::storage", key, value = %encoded, "saved"),
            Err(err) => warn!(target: "mensa_core::storage", key, error = %err, "write dropped"),
        }
    }
}
