#![forbid(unsafe_code)]

//! WASM frontend for canteen display preferences.
//!
//! This crate binds [`mensa_core::PreferenceSession`] to the browser:
//! - `dom`: the [`mensa_core::DocumentAdapter`] over `web-sys` and the
//!   `localStorage` key-value store.
//! - `transport`: fire-and-forget `fetch` pushes.
//! - `wasm`: the exported `CanteenPreferences` object.
//!
//! Only [`markup`] compiles on native targets; it owns the template naming
//! rules and host configuration.

pub mod markup;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod transport;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use markup::{MarkupConfig, WebConfig};

#[cfg(target_arch = "wasm32")]
pub use wasm::CanteenPreferences;
