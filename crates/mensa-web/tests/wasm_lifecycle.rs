#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

//! Controller lifecycle against a real browser window.
//!
//! Run:
//!   wasm-pack test --headless --firefox crates/mensa-web

use std::cell::Cell;
use std::rc::Rc;

use mensa_web::CanteenPreferences;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

/// Count uncaught errors raised by listeners while `f` runs.
fn uncaught_errors_during(f: impl FnOnce(&web_sys::Window)) -> u32 {
    let window = web_sys::window().expect("browser window");
    let errors = Rc::new(Cell::new(0));
    let counter = Rc::clone(&errors);
    let on_error = Closure::<dyn FnMut()>::new(move || counter.set(counter.get() + 1));
    window
        .add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
        .expect("register error listener");

    f(&window);

    window
        .remove_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
        .expect("unregister error listener");
    errors.get()
}

fn fire_resize(window: &web_sys::Window) {
    let event = web_sys::Event::new("resize").expect("resize event");
    window.dispatch_event(&event).expect("dispatch resize");
}

#[wasm_bindgen_test]
fn resize_after_drop_is_harmless() {
    let errors = uncaught_errors_during(|window| {
        let prefs = CanteenPreferences::new(None).expect("controller on empty page");
        fire_resize(window);
        drop(prefs);
        fire_resize(window);
    });
    assert_eq!(errors, 0);
}

#[wasm_bindgen_test]
fn resize_after_destroy_is_harmless() {
    let errors = uncaught_errors_during(|window| {
        let prefs = CanteenPreferences::new(None).expect("controller on empty page");
        prefs.destroy();
        fire_resize(window);
    });
    assert_eq!(errors, 0);
}
