#![forbid(unsafe_code)]

//! Fire-and-forget `fetch` transport for preference pushes.
//!
//! Each dispatch spawns a detached future on the page's event loop. Nothing
//! awaits it and nothing retries it; failures end in a `warn!`.

use mensa_core::{PushRequest, PushTransport};
use tracing::{trace, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, Response, UrlSearchParams, Window};

pub struct FetchTransport {
    window: Window,
}

impl FetchTransport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

fn build_request(request: &PushRequest) -> Result<Request, JsValue> {
    let body = UrlSearchParams::new()?;
    for (name, value) in &request.fields {
        body.append(name, value);
    }
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_credentials(RequestCredentials::SameOrigin);
    init.set_body(&body.into());
    Request::new_with_str_and_init(&request.endpoint, &init)
}

async fn send(window: Window, request: PushRequest) -> Result<u16, JsValue> {
    let fetch = window.fetch_with_request(&build_request(&request)?);
    let response: Response = JsFuture::from(fetch).await?.dyn_into()?;
    if response.ok() {
        Ok(response.status())
    } else {
        Err(JsValue::from_str(&format!("HTTP {}", response.status())))
    }
}

impl PushTransport for FetchTransport {
    fn dispatch(&self, request: PushRequest) {
        let window = self.window.clone();
        let endpoint = request.endpoint.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match send(window, request).await {
                Ok(status) => trace!(
                    target: "mensa_web::transport",
                    endpoint = endpoint.as_str(),
                    status,
                    "preference push delivered"
                ),
                Err(err) => warn!(
                    target: "mensa_web::transport",
                    endpoint = endpoint.as_str(),
                    error = ?err,
                    "preference push failed; local state stays authoritative"
                ),
            }
        });
    }
}
