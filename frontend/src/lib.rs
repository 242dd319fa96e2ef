extern crate console_error_panic_hook;
extern crate serde;

pub mod api;
pub mod app;
pub mod config;
pub mod connection;
pub mod dom;
pub mod markup;
pub mod payloads;
pub mod post;
pub mod render;
pub mod session;
pub mod view;

use std::rc::Rc;

use log::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Window};

use crate::api::ApiClient;
use crate::app::App;
use crate::config::{ClientConfig, API_BASE_ATTRIBUTE, LOG_LEVEL_ATTRIBUTE};
use crate::connection::FrontendConnection;
use crate::dom::DomUi;
use crate::session::{BrowserStorage, Session};

pub type BrowserApp = App<FrontendConnection, BrowserStorage, DomUi>;

/// Best effort text for a thrown JS value.
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }

    match value.dyn_ref::<js_sys::Error>() {
        Some(err) => String::from(err.message()),
        None => format!("{:?}", value),
    }
}

pub fn window_document_and_root(selector: &str) -> Result<(Window, Document, Element), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let root = document
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("no element matches {}", selector)))?;

    Ok((window, document, root))
}

fn init_logger(config: &ClientConfig) {
    // a second bootstrap on the same page keeps the first logger
    let _ = console_log::init_with_level(config.log_level);
}

/// Configuration for the page mounted under `root`; an explicit
/// `api_base_url` wins over the root element's attribute.
pub fn config_for_root(root: &Element, api_base_url: Option<&str>) -> ClientConfig {
    ClientConfig::default().resolve(
        root.get_attribute(API_BASE_ATTRIBUTE).as_deref(),
        root.get_attribute(LOG_LEVEL_ATTRIBUTE).as_deref(),
        api_base_url,
    )
}

fn start(api_base_url: Option<&str>) -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let (window, document, root) = window_document_and_root(&ClientConfig::default().root_selector)?;
    let config = config_for_root(&root, api_base_url);
    init_logger(&config);
    info!("starting against {}", config.api_base_url);

    let page = dom::build_page(&document, &root)?;
    let storage = BrowserStorage::from_window().map_err(|err| JsValue::from_str(&err.to_string()))?;

    let app: Rc<BrowserApp> = Rc::new(App::new(
        ApiClient::new(FrontendConnection::new(&config.api_base_url)),
        Session::new(storage, config.token_storage_key.as_str()),
        DomUi::new(window, document, page.clone()),
    ));
    dom::bind_handlers(&app, &page);

    spawn_local(async move { app.start().await });

    Ok(())
}

fn report(result: Result<(), JsValue>) -> Result<(), JsValue> {
    if let Err(err) = &result {
        error!("bootstrap failed: {}", describe_js_error(err));
    }
    result
}

#[wasm_bindgen]
pub fn bootstrap() -> Result<(), JsValue> {
    report(start(None))
}

/// Like [`bootstrap`], for pages that pass the API location from script.
#[wasm_bindgen]
pub fn bootstrap_with_base_url(api_base_url: &str) -> Result<(), JsValue> {
    report(start(Some(api_base_url)))
}
