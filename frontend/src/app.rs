use std::cell::Cell;

use log::{info, warn};

use crate::api::{ApiClient, ApiError, Transport};
use crate::markup::Element;
use crate::render::{render_error, render_feed};
use crate::session::{Session, TokenStore};
use crate::view::View;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed.";
pub const SESSION_SAVE_FAILED_MESSAGE: &str = "Could not save your session.";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration failed.";
pub const REGISTERED_MESSAGE: &str = "Registration successful! Please log in.";
pub const FEED_FAILED_MESSAGE: &str = "Failed to load feed.";
pub const NO_FILE_MESSAGE: &str = "Please select a file.";
pub const UPLOADING_MESSAGE: &str = "Uploading...";
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed.";
pub const DELETE_FAILED_MESSAGE: &str = "Delete failed.";
pub const CONFIRM_DELETE_MESSAGE: &str = "Delete this post?";

/// Everything the actions need from the page.
pub trait Ui {
    type File;

    fn show_view(&self, view: View);
    fn set_auth_message(&self, message: &str);
    fn set_upload_message(&self, message: &str);
    /// Replaces the feed area with `feed`, dropping whatever was there.
    fn show_feed(&self, feed: &Element);
    fn selected_file(&self) -> Option<Self::File>;
    fn caption(&self) -> String;
    fn clear_upload_inputs(&self);
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// Message for a failed action: the server's detail when it gave one, the
/// network message when no response arrived, otherwise the fallback.
pub fn failure_message(err: &ApiError, fallback: &str) -> String {
    if err.is_transport() {
        return NETWORK_ERROR_MESSAGE.to_owned();
    }

    err.detail().unwrap_or(fallback).to_owned()
}

/// Each action runs to completion on its own and ends either in a view
/// transition or a visible message; nothing is returned to the caller.
pub struct App<T, S, U> {
    api: ApiClient<T>,
    session: Session<S>,
    ui: U,
    view: Cell<View>,
}

impl<T, S, U> App<T, S, U>
where
    T: Transport,
    S: TokenStore,
    U: Ui<File = T::File>,
{
    pub fn new(api: ApiClient<T>, session: Session<S>, ui: U) -> Self {
        App {
            api,
            session,
            ui,
            view: Cell::new(View::Unauthenticated),
        }
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn view(&self) -> View {
        self.view.get()
    }

    fn transition(&self, view: View) {
        if self.view.get() != view {
            info!("view {:?} -> {:?}", self.view.get(), view);
        }
        self.view.set(view);
        self.ui.show_view(view);
    }

    fn expire_session(&self) {
        info!("session expired");
        self.session.clear_token();
        self.transition(View::Unauthenticated);
    }

    /// Page load: a stored token goes straight to the feed.
    pub async fn start(&self) {
        let view = View::for_token(self.session.get_token().as_deref());
        self.transition(view);

        if view == View::Authenticated {
            self.fetch_feed().await;
        }
    }

    pub async fn login(&self, email: &str, password: &str) {
        let token = match self.api.login(email, password).await {
            Ok(token) => token,
            Err(err) => {
                warn!("login failed: {}", err);
                self.ui
                    .set_auth_message(&failure_message(&err, LOGIN_FAILED_MESSAGE));
                return;
            }
        };

        if let Err(err) = self.session.set_token(&token) {
            warn!("{}", err);
            self.ui.set_auth_message(SESSION_SAVE_FAILED_MESSAGE);
            return;
        }

        self.ui.set_auth_message("");
        self.transition(View::Authenticated);
        self.fetch_feed().await;
    }

    pub async fn register(&self, email: &str, password: &str) {
        match self.api.register(email, password).await {
            Ok(()) => {
                info!("registered {}", email);
                self.ui.set_auth_message(REGISTERED_MESSAGE);
            }
            Err(err) => {
                warn!("registration failed: {}", err);
                self.ui
                    .set_auth_message(&failure_message(&err, REGISTER_FAILED_MESSAGE));
            }
        }
    }

    pub fn logout(&self) {
        self.session.clear_token();
        self.transition(View::Unauthenticated);
    }

    pub async fn fetch_feed(&self) {
        let Some(token) = self.session.get_token() else {
            self.expire_session();
            return;
        };

        match self.api.feed(&token).await {
            Ok(posts) => {
                info!("rendering {} posts", posts.len());
                self.ui.show_feed(&render_feed(&posts));
            }
            Err(ApiError::Unauthorized { .. }) => self.expire_session(),
            Err(err) => {
                warn!("feed failed: {}", err);
                self.ui
                    .show_feed(&render_error(&failure_message(&err, FEED_FAILED_MESSAGE)));
            }
        }
    }

    pub async fn upload_file(&self) {
        let Some(file) = self.ui.selected_file() else {
            self.ui.set_upload_message(NO_FILE_MESSAGE);
            return;
        };

        let Some(token) = self.session.get_token() else {
            self.expire_session();
            return;
        };

        self.ui.set_upload_message(UPLOADING_MESSAGE);
        let caption = self.ui.caption();

        match self.api.upload(&token, file, &caption).await {
            Ok(()) => {
                self.ui.clear_upload_inputs();
                self.ui.set_upload_message("");
                self.fetch_feed().await;
            }
            Err(err) => {
                warn!("upload failed: {}", err);
                self.ui
                    .set_upload_message(&failure_message(&err, UPLOAD_FAILED_MESSAGE));
            }
        }
    }

    pub async fn delete_post(&self, post_id: &str) {
        if !self.ui.confirm(CONFIRM_DELETE_MESSAGE) {
            return;
        }

        let Some(token) = self.session.get_token() else {
            self.expire_session();
            return;
        };

        match self.api.delete(&token, post_id).await {
            Ok(()) => {
                info!("deleted post {}", post_id);
                self.fetch_feed().await;
            }
            Err(err) => {
                warn!("delete of {} failed: {}", post_id, err);
                self.ui.alert(&failure_message(&err, DELETE_FAILED_MESSAGE));
            }
        }
    }
}
