//! Browser `fetch` transport

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::{AdvisorError, AdvisorResult, Transport};

fn js_error(value: wasm_bindgen::JsValue) -> AdvisorError {
    AdvisorError::Transport(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn post_json(&self, url: &str, body: String) -> AdvisorResult<String> {
        let window =
            web_sys::window().ok_or_else(|| AdvisorError::Transport("no window".into()))?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_mode(RequestMode::Cors);
        init.set_body(&wasm_bindgen::JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(url, &init).map_err(js_error)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;

        if !response.ok() {
            return Err(AdvisorError::Status(response.status()));
        }

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        text.as_string()
            .ok_or_else(|| AdvisorError::Transport("response body was not text".into()))
    }
}
