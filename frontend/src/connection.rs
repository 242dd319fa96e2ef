use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Headers, Request, RequestInit, Response, UrlSearchParams};

use crate::api::{ApiRequest, ApiResponse, Body, Transport, TransportError};
use crate::describe_js_error;

/// Sends requests with `window.fetch` against one API base URL.
pub struct FrontendConnection {
    base_url: String,
}

impl FrontendConnection {
    /// `base_url` comes from [`crate::config::ClientConfig`], already normalized.
    pub fn new(base_url: &str) -> Self {
        FrontendConnection {
            base_url: base_url.to_owned(),
        }
    }

    async fn fetch(&self, request: ApiRequest<File>) -> Result<ApiResponse, JsValue> {
        let url = request.url(&self.base_url);
        let init = RequestInit::new();
        init.set_method(request.method.as_str());

        let headers = Headers::new()?;
        if let Some(token) = &request.bearer {
            headers.set("Authorization", &format!("Bearer {}", token))?;
        }

        match request.body {
            Body::Empty => {}
            Body::Form(fields) => {
                let params = UrlSearchParams::new()?;
                for (name, value) in &fields {
                    params.append(name, value);
                }
                init.set_body(&params);
            }
            Body::Json(value) => {
                headers.set("Content-Type", "application/json")?;
                init.set_body(&JsValue::from_str(&value.to_string()));
            }
            Body::Multipart { file, caption } => {
                let form = FormData::new()?;
                form.append_with_blob_and_filename("file", &file, &file.name())?;
                form.append_with_str("caption", &caption)?;
                init.set_body(&form);
            }
        }
        init.set_headers(&headers);

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let request = Request::new_with_str_and_init(&url, &init)?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await?
            .dyn_into()?;

        let body = JsFuture::from(response.text()?)
            .await?
            .as_string()
            .unwrap_or_default();

        Ok(ApiResponse::new(response.status(), body))
    }
}

impl Transport for FrontendConnection {
    type File = File;

    async fn send(&self, request: ApiRequest<File>) -> Result<ApiResponse, TransportError> {
        self.fetch(request)
            .await
            .map_err(|err| TransportError(describe_js_error(&err)))
    }
}
