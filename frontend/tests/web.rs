#![cfg(target_arch = "wasm32")]

extern crate media_feed_frontend;
extern crate wasm_bindgen_test;

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlElement};

use log::Level;

use media_feed_frontend::app::{Ui, FEED_FAILED_MESSAGE};
use media_feed_frontend::config_for_root;
use media_feed_frontend::markup::el;
use media_feed_frontend::dom::{build_page, clicked_post_id, DomUi};
use media_feed_frontend::post::{MediaKind, Post};
use media_feed_frontend::render::{ids, render_feed};
use media_feed_frontend::session::{BrowserStorage, Session, TokenStore};
use media_feed_frontend::view::View;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn fresh_root(id: &str) -> Element {
    let document = document();
    if let Some(existing) = document.get_element_by_id(id) {
        existing.remove();
    }
    let root = document.create_element("div").unwrap();
    root.set_id(id);
    document.body().unwrap().append_child(&root).unwrap();
    root
}

fn post(id: &str, caption: &str, is_owner: bool) -> Post {
    Post {
        id: id.to_owned(),
        email: Some("a@b.com".to_owned()),
        url: "/media/a.jpg".to_owned(),
        file_type: MediaKind::Image,
        caption: caption.to_owned(),
        created_at: "2025-01-05T14:03:00".to_owned(),
        is_owner,
        user_id: None,
        file_name: None,
    }
}

#[wasm_bindgen_test]
fn browser_storage_round_trips_the_token() {
    let session = Session::new(BrowserStorage::from_window().unwrap(), "media_feed_test_token");
    session.clear_token();
    assert_eq!(session.get_token(), None);

    session.set_token("tok123").unwrap();
    assert_eq!(
        session.store().read("media_feed_test_token").unwrap().as_deref(),
        Some("tok123")
    );

    session.clear_token();
    assert!(!session.is_signed_in());
}

#[wasm_bindgen_test]
fn view_switch_toggles_hidden() {
    let root = fresh_root("media_feed_view_test");
    let document = document();
    let page = build_page(&document, &root).unwrap();
    let ui = DomUi::new(web_sys::window().unwrap(), document, page.clone());

    ui.show_view(View::Authenticated);
    assert!(page.auth_view.hidden());
    assert!(!page.app_view.hidden());

    ui.show_view(View::Unauthenticated);
    assert!(!page.auth_view.hidden());
    assert!(page.app_view.hidden());

    ui.set_auth_message("Login failed.");
    assert_eq!(page.auth_message.text_content().as_deref(), Some("Login failed."));
}

#[wasm_bindgen_test]
fn mounted_feed_escapes_and_replaces() {
    let root = fresh_root("media_feed_mount_test");
    let document = document();
    let page = build_page(&document, &root).unwrap();
    let ui = DomUi::new(web_sys::window().unwrap(), document, page.clone());

    ui.show_feed(&render_feed(&[
        post("1", "<script>alert(1)</script>", true),
        post("2", "plain", false),
    ]));

    assert_eq!(page.feed.query_selector_all(".post").unwrap().length(), 2);
    assert_eq!(page.feed.query_selector_all("script").unwrap().length(), 0);
    assert_eq!(page.feed.query_selector_all(".delete-post").unwrap().length(), 1);

    ui.show_feed(&render_feed(&[]));
    assert_eq!(page.feed.query_selector_all(".post").unwrap().length(), 0);
    assert!(page
        .feed
        .text_content()
        .unwrap_or_default()
        .contains("No posts yet"));
}

#[wasm_bindgen_test]
fn delete_click_resolves_the_post_id() {
    let root = fresh_root("media_feed_click_test");
    let document = document();
    let page = build_page(&document, &root).unwrap();
    let ui = DomUi::new(web_sys::window().unwrap(), document.clone(), page.clone());
    ui.show_feed(&render_feed(&[post("42", "mine", true)]));

    let button: HtmlElement = page
        .feed
        .query_selector(".delete-post")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();

    let event = web_sys::Event::new("click").unwrap();
    button.dispatch_event(&event).unwrap();
    assert_eq!(clicked_post_id(&event).as_deref(), Some("42"));

    let caption = page.feed.query_selector(".post-caption").unwrap().unwrap();
    let event = web_sys::Event::new("click").unwrap();
    caption.dispatch_event(&event).unwrap();
    assert_eq!(clicked_post_id(&event), None);
}

#[wasm_bindgen_test]
fn shell_exposes_every_control() {
    let root = fresh_root("media_feed_shell_test");
    let document = document();
    build_page(&document, &root).unwrap();

    for id in [
        ids::EMAIL_INPUT,
        ids::PASSWORD_INPUT,
        ids::LOGIN_BUTTON,
        ids::REGISTER_BUTTON,
        ids::LOGOUT_BUTTON,
        ids::FILE_INPUT,
        ids::CAPTION_INPUT,
        ids::UPLOAD_BUTTON,
        ids::FEED,
    ] {
        assert!(document.get_element_by_id(id).is_some(), "missing #{}", id);
    }
}

#[wasm_bindgen_test]
fn root_attributes_configure_the_client() {
    let root = fresh_root("media_feed_config_test");
    root.set_attribute("data-api-base", "http://x/").unwrap();
    root.set_attribute("data-log-level", "debug").unwrap();

    let config = config_for_root(&root, None);
    assert_eq!(config.api_base_url, "http://x");
    assert_eq!(config.log_level, Level::Debug);

    let config = config_for_root(&root, Some("https://api.example.com/"));
    assert_eq!(config.api_base_url, "https://api.example.com");
    assert_eq!(config.log_level, Level::Debug);
}

#[wasm_bindgen_test]
fn unmountable_feed_shows_the_failure_message() {
    let root = fresh_root("media_feed_fallback_test");
    let document = document();
    let page = build_page(&document, &root).unwrap();
    let ui = DomUi::new(web_sys::window().unwrap(), document, page.clone());

    // createElement rejects tag names containing spaces
    ui.show_feed(&el("not a tag").text("x"));

    assert_eq!(
        page.feed.text_content().as_deref(),
        Some(FEED_FAILED_MESSAGE)
    );
}
