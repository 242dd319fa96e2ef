use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, File, HtmlElement, HtmlInputElement, Window};

use crate::api::Transport;
use crate::app::{App, Ui, FEED_FAILED_MESSAGE};
use crate::markup::{self, Node};
use crate::render::{ids, page_shell, POST_ID_ATTRIBUTE};
use crate::session::TokenStore;
use crate::view::View;

/// Appends `node` below `parent` as real DOM nodes.
pub fn mount(document: &Document, parent: &web_sys::Node, node: &Node) -> Result<(), JsValue> {
    match node {
        Node::Text(text) => {
            parent.append_child(&document.create_text_node(text))?;
        }
        Node::Element(element) => {
            let created = document.create_element(element.tag())?;
            for (name, value) in element.attributes() {
                created.set_attribute(name, value)?;
            }
            for child in element.child_nodes() {
                mount(document, &created, child)?;
            }
            parent.append_child(&created)?;
        }
    }

    Ok(())
}

pub fn replace_children(
    document: &Document,
    parent: &Element,
    element: &markup::Element,
) -> Result<(), JsValue> {
    parent.set_inner_html("");
    mount(document, parent, &Node::Element(element.clone()))
}

fn element_by_id<T: JsCast>(root: &Element, id: &str) -> Result<T, JsValue> {
    root.query_selector(&format!("#{}", id))?
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("unexpected element type for #{}", id)))
}

/// Handles to the mounted page shell.
#[derive(Clone)]
pub struct PageElements {
    pub auth_view: HtmlElement,
    pub app_view: HtmlElement,
    pub email_input: HtmlInputElement,
    pub password_input: HtmlInputElement,
    pub login_button: HtmlElement,
    pub register_button: HtmlElement,
    pub auth_message: HtmlElement,
    pub logout_button: HtmlElement,
    pub file_input: HtmlInputElement,
    pub caption_input: HtmlInputElement,
    pub upload_button: HtmlElement,
    pub upload_message: HtmlElement,
    pub feed: HtmlElement,
}

pub fn build_page(document: &Document, root: &Element) -> Result<PageElements, JsValue> {
    replace_children(document, root, &page_shell())?;

    Ok(PageElements {
        auth_view: element_by_id(root, ids::AUTH_VIEW)?,
        app_view: element_by_id(root, ids::APP_VIEW)?,
        email_input: element_by_id(root, ids::EMAIL_INPUT)?,
        password_input: element_by_id(root, ids::PASSWORD_INPUT)?,
        login_button: element_by_id(root, ids::LOGIN_BUTTON)?,
        register_button: element_by_id(root, ids::REGISTER_BUTTON)?,
        auth_message: element_by_id(root, ids::AUTH_MESSAGE)?,
        logout_button: element_by_id(root, ids::LOGOUT_BUTTON)?,
        file_input: element_by_id(root, ids::FILE_INPUT)?,
        caption_input: element_by_id(root, ids::CAPTION_INPUT)?,
        upload_button: element_by_id(root, ids::UPLOAD_BUTTON)?,
        upload_message: element_by_id(root, ids::UPLOAD_MESSAGE)?,
        feed: element_by_id(root, ids::FEED)?,
    })
}

pub struct DomUi {
    window: Window,
    document: Document,
    page: PageElements,
}

impl DomUi {
    pub fn new(window: Window, document: Document, page: PageElements) -> Self {
        DomUi {
            window,
            document,
            page,
        }
    }
}

impl Ui for DomUi {
    type File = File;

    fn show_view(&self, view: View) {
        self.page
            .auth_view
            .set_hidden(view != View::Unauthenticated);
        self.page.app_view.set_hidden(view != View::Authenticated);
    }

    fn set_auth_message(&self, message: &str) {
        self.page.auth_message.set_text_content(Some(message));
    }

    fn set_upload_message(&self, message: &str) {
        self.page.upload_message.set_text_content(Some(message));
    }

    fn show_feed(&self, feed: &markup::Element) {
        if let Err(err) = replace_children(&self.document, &self.page.feed, feed) {
            warn!("could not render feed: {:?}", err);
            self.page.feed.set_text_content(Some(FEED_FAILED_MESSAGE));
        }
    }

    fn selected_file(&self) -> Option<File> {
        self.page.file_input.files().and_then(|files| files.get(0))
    }

    fn caption(&self) -> String {
        self.page.caption_input.value()
    }

    fn clear_upload_inputs(&self) {
        self.page.file_input.set_value("");
        self.page.caption_input.set_value("");
    }

    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or_else(|err| {
            warn!("confirm dialog failed: {:?}", err);
            false
        })
    }

    fn alert(&self, message: &str) {
        if let Err(err) = self.window.alert_with_message(message) {
            warn!("alert dialog failed: {:?}", err);
        }
    }
}

fn on_click<F>(target: &HtmlElement, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let handler = Closure::<dyn FnMut(Event)>::new(handler);
    target.set_onclick(Some(handler.as_ref().unchecked_ref()));
    handler.forget();
}

/// The post id of the delete control the click landed on, if any.
pub fn clicked_post_id(event: &Event) -> Option<String> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(&format!("[{}]", POST_ID_ATTRIBUTE))
        .ok()??
        .get_attribute(POST_ID_ATTRIBUTE)
}

/// Wires the page's controls to the controller's actions.
pub fn bind_handlers<T, S>(app: &Rc<App<T, S, DomUi>>, page: &PageElements)
where
    T: Transport<File = File> + 'static,
    S: TokenStore + 'static,
{
    let login_app = app.clone();
    let email_input = page.email_input.clone();
    let password_input = page.password_input.clone();
    on_click(&page.login_button, move |event: Event| {
        event.prevent_default();
        let app = login_app.clone();
        let email = email_input.value();
        let password = password_input.value();
        spawn_local(async move { app.login(&email, &password).await });
    });

    let register_app = app.clone();
    let email_input = page.email_input.clone();
    let password_input = page.password_input.clone();
    on_click(&page.register_button, move |event: Event| {
        event.prevent_default();
        let app = register_app.clone();
        let email = email_input.value();
        let password = password_input.value();
        spawn_local(async move { app.register(&email, &password).await });
    });

    let logout_app = app.clone();
    on_click(&page.logout_button, move |event: Event| {
        event.prevent_default();
        logout_app.logout();
    });

    let upload_app = app.clone();
    on_click(&page.upload_button, move |event: Event| {
        event.prevent_default();
        let app = upload_app.clone();
        spawn_local(async move { app.upload_file().await });
    });

    // one delegated handler; the feed is re-rendered wholesale on every fetch
    let delete_app = app.clone();
    on_click(&page.feed, move |event: Event| {
        if let Some(post_id) = clicked_post_id(&event) {
            let app = delete_app.clone();
            spawn_local(async move { app.delete_post(&post_id).await });
        }
    });
}
