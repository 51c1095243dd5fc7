#![forbid(unsafe_code)]

//! `wasm-bindgen` exports.
//!
//! [`CanteenPreferences`] is the single object the page constructs at load.
//! The template's inline handlers call its methods instead of page-wide
//! globals.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use mensa_core::{ItemId, MoveDirection, PersistentState, PreferenceSession, RemoteSync};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dom::{DomDocument, LocalStorage};
use crate::markup::WebConfig;
use crate::transport::FetchTransport;

type Session = PreferenceSession<DomDocument, LocalStorage, FetchTransport>;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

/// JS ids arrive as numbers; anything that is not an integer is unknown.
fn item_id(raw: f64) -> Option<ItemId> {
    (raw.is_finite() && raw.fract() == 0.0).then(|| ItemId::new(raw as i64))
}

/// Page-lifetime preference controller.
#[wasm_bindgen]
pub struct CanteenPreferences {
    session: Rc<RefCell<Session>>,
    on_resize: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl CanteenPreferences {
    /// Build the session, run the load sequence and start tracking resizes.
    ///
    /// `config_json` overrides any subset of the defaults. Only a malformed
    /// config or a missing document is reported as an error; a missing
    /// `localStorage` degrades to a read-only page.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<CanteenPreferences, JsValue> {
        install_panic_hook();

        let config = match config_json.as_deref() {
            Some(json) => WebConfig::from_json_str(json)
                .map_err(|err| JsValue::from_str(&err.to_string()))?,
            None => WebConfig::default(),
        };

        let document =
            DomDocument::from_window(config.markup.clone(), config.prefs.sections.clone())
                .ok_or_else(|| JsValue::from_str("no window/document available"))?;
        let window = document.window().clone();

        let state = match LocalStorage::from_window(&window) {
            Some(storage) => PersistentState::new(storage, config.prefs.storage.clone()),
            None => PersistentState::unsupported(config.prefs.storage.clone()),
        };
        let transport = FetchTransport::new(window.clone());
        let remote = RemoteSync::new(transport, config.prefs.remote.clone())
            .with_token(document.csrf_token());

        let mut session = PreferenceSession::new(document, state, remote, &config.prefs);
        session.load();
        let session = Rc::new(RefCell::new(session));

        let handle = Rc::clone(&session);
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            if let Ok(mut session) = handle.try_borrow_mut() {
                session.resize();
            }
        });
        let on_resize = window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            .is_ok()
            .then_some(on_resize);

        Ok(Self { session, on_resize })
    }

    /// Move a canteen one step. `direction` is `-1` (up) or `+1` (down).
    ///
    /// Returns whether anything moved.
    #[wasm_bindgen(js_name = moveCanteen)]
    pub fn move_canteen(&self, direction: i32, canteen: f64) -> bool {
        let (Some(direction), Some(id)) = (MoveDirection::from_step(direction), item_id(canteen))
        else {
            return false;
        };
        self.session.borrow_mut().move_item(direction, id)
    }

    /// Hide a canteen in every day section.
    ///
    /// Returns `true` when it was already hidden or is unknown.
    #[wasm_bindgen(js_name = hideCanteen)]
    pub fn hide_canteen(&self, canteen: f64) -> bool {
        let Some(id) = item_id(canteen) else {
            return true;
        };
        self.session.borrow_mut().hide(id)
    }

    /// Restore every hidden canteen to the end of the order.
    #[wasm_bindgen(js_name = showHiddenCanteens)]
    pub fn show_hidden_canteens(&self) {
        self.session.borrow_mut().show_all();
    }

    /// Re-run the height alignment (e.g. after fonts or images load).
    #[wasm_bindgen(js_name = syncHeights)]
    pub fn sync_heights(&self) {
        self.session.borrow_mut().resize();
    }

    /// Current order as a plain array of ids.
    #[wasm_bindgen(js_name = canteenOrder)]
    pub fn canteen_order(&self) -> Vec<f64> {
        self.session
            .borrow()
            .ordering()
            .iter()
            .map(|id| id.get() as f64)
            .collect()
    }

    /// Currently hidden ids.
    #[wasm_bindgen(js_name = hiddenCanteens)]
    pub fn hidden_canteens(&self) -> Vec<f64> {
        self.session
            .borrow()
            .hidden()
            .iter()
            .map(|id| id.get() as f64)
            .collect()
    }

    /// Stop listening for viewport resizes.
    ///
    /// Consumes the handle; the JS object is unusable afterwards.
    pub fn destroy(mut self) {
        self.detach_resize();
    }
}

impl CanteenPreferences {
    fn detach_resize(&mut self) {
        let Some(on_resize) = self.on_resize.take() else {
            return;
        };
        let Ok(session) = self.session.try_borrow() else {
            return;
        };
        let _ = session
            .document()
            .window()
            .remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
    }
}

impl Drop for CanteenPreferences {
    fn drop(&mut self) {
        self.detach_resize();
    }
}
