#![forbid(unsafe_code)]

//! Identifier types: [`ItemId`], [`ItemOrder`], [`HiddenSet`] and [`DomSnapshot`].
//!
//! All three sequences are duplicate-free by construction. They keep insertion
//! order because it is meaningful everywhere: display order for
//! [`ItemOrder`], restore order for [`HiddenSet`], encounter order for
//! [`DomSnapshot`].

use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of one repeating item (a canteen).
///
/// Stable across sections; the same id is rendered once per section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Parse a decimal identifier as found in markup attributes and
    /// comma-joined payload lists. Surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().map(Self)
    }
}

impl From<i64> for ItemId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<i32> for ItemId {
    fn from(raw: i32) -> Self {
        Self(i64::from(raw))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! id_sequence {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
        #[serde(transparent)]
        pub struct $name {
            ids: Vec<ItemId>,
        }

        impl $name {
            #[must_use]
            pub const fn new() -> Self {
                Self { ids: Vec::new() }
            }

            /// Build from any id stream, keeping the first occurrence of
            /// each id.
            pub fn from_ids<I>(ids: I) -> Self
            where
                I: IntoIterator,
                I::Item: Into<ItemId>,
            {
                let mut out = Self::new();
                for id in ids {
                    out.push(id.into());
                }
                out
            }

            #[must_use]
            pub fn len(&self) -> usize {
                self.ids.len()
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.ids.is_empty()
            }

            #[must_use]
            pub fn contains(&self, id: ItemId) -> bool {
                self.ids.contains(&id)
            }

            #[must_use]
            pub fn position(&self, id: ItemId) -> Option<usize> {
                self.ids.iter().position(|&candidate| candidate == id)
            }

            #[must_use]
            pub fn as_slice(&self) -> &[ItemId] {
                &self.ids
            }

            #[must_use]
            pub fn first(&self) -> Option<ItemId> {
                self.ids.first().copied()
            }

            #[must_use]
            pub fn last(&self) -> Option<ItemId> {
                self.ids.last().copied()
            }

            pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
                self.ids.iter().copied()
            }

            /// Append `id` unless it is already present. Returns whether it
            /// was appended.
            pub fn push(&mut self, id: ItemId) -> bool {
                if self.contains(id) {
                    return false;
                }
                self.ids.push(id);
                true
            }

            /// Remove `id`, preserving the order of the remaining entries.
            pub fn remove(&mut self, id: ItemId) -> bool {
                match self.position(id) {
                    Some(index) => {
                        self.ids.remove(index);
                        true
                    }
                    None => false,
                }
            }

            /// Stable filter: survivors keep their relative order.
            pub fn retain(&mut self, mut keep: impl FnMut(ItemId) -> bool) {
                self.ids.retain(|&id| keep(id));
            }

            pub fn clear(&mut self) {
                self.ids.clear();
            }

            /// Comma-joined wire form used by the remote endpoint.
            #[must_use]
            pub fn to_csv(&self) -> String {
                let mut out = String::new();
                for (index, id) in self.ids.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    out.push_str(&id.to_string());
                }
                out
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                Vec::<ItemId>::deserialize(deserializer).map(Self::from_ids)
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = ItemId;
            type IntoIter = core::iter::Copied<core::slice::Iter<'a, ItemId>>;

            fn into_iter(self) -> Self::IntoIter {
                self.ids.iter().copied()
            }
        }
    };
}

id_sequence! {
    /// The user's preferred display order of visible items.
    ItemOrder
}

id_sequence! {
    /// Items explicitly suppressed from display, in the order they were hidden.
    HiddenSet
}

id_sequence! {
    /// Deduplicated ids of every rendered item node, in first-seen order.
    DomSnapshot
}

impl ItemOrder {
    /// Swap the entries at `a` and `b`. Out-of-range indices are ignored.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a < self.ids.len() && b < self.ids.len() {
            self.ids.swap(a, b);
        }
    }
}

impl From<&DomSnapshot> for ItemOrder {
    fn from(snapshot: &DomSnapshot) -> Self {
        Self {
            ids: snapshot.ids.clone(),
        }
    }
}
