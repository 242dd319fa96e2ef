use chrono::{DateTime, NaiveDateTime};

use crate::markup::{el, Element};
use crate::post::{MediaKind, Post};

pub const EMPTY_FEED_MESSAGE: &str = "No posts yet. Upload something!";
pub const UNKNOWN_AUTHOR: &str = "Unknown user";

pub const FEED_CLASS: &str = "feed";
pub const POST_CLASS: &str = "post";
pub const DELETE_CLASS: &str = "delete-post";
pub const EMPTY_FEED_CLASS: &str = "empty-feed";
pub const FEED_ERROR_CLASS: &str = "feed-error";
pub const POST_ID_ATTRIBUTE: &str = "data-post-id";

const TIMESTAMP_FORMAT: &str = "%b %-d, %Y %H:%M";
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Element ids of the page shell, looked up again after mounting.
pub mod ids {
    pub const AUTH_VIEW: &str = "auth-view";
    pub const APP_VIEW: &str = "app-view";
    pub const EMAIL_INPUT: &str = "email";
    pub const PASSWORD_INPUT: &str = "password";
    pub const LOGIN_BUTTON: &str = "login-button";
    pub const REGISTER_BUTTON: &str = "register-button";
    pub const AUTH_MESSAGE: &str = "auth-message";
    pub const LOGOUT_BUTTON: &str = "logout-button";
    pub const FILE_INPUT: &str = "file-input";
    pub const CAPTION_INPUT: &str = "caption-input";
    pub const UPLOAD_BUTTON: &str = "upload-button";
    pub const UPLOAD_MESSAGE: &str = "upload-message";
    pub const FEED: &str = "feed";
}

/// Both views are built up front; the view switcher only toggles `hidden`.
pub fn page_shell() -> Element {
    let auth_view = el("section")
        .id(ids::AUTH_VIEW)
        .flag("hidden")
        .child(el("h2").text("Sign in"))
        .child(
            el("input")
                .id(ids::EMAIL_INPUT)
                .attr("type", "email")
                .attr("placeholder", "Email"),
        )
        .child(
            el("input")
                .id(ids::PASSWORD_INPUT)
                .attr("type", "password")
                .attr("placeholder", "Password"),
        )
        .child(el("button").id(ids::LOGIN_BUTTON).text("Login"))
        .child(el("button").id(ids::REGISTER_BUTTON).text("Register"))
        .child(el("div").id(ids::AUTH_MESSAGE).class("message"));

    let upload = el("div")
        .class("upload")
        .child(
            el("input")
                .id(ids::FILE_INPUT)
                .attr("type", "file")
                .attr("accept", "image/*,video/*"),
        )
        .child(
            el("input")
                .id(ids::CAPTION_INPUT)
                .attr("type", "text")
                .attr("placeholder", "Caption"),
        )
        .child(el("button").id(ids::UPLOAD_BUTTON).text("Upload"))
        .child(el("div").id(ids::UPLOAD_MESSAGE).class("message"));

    let app_view = el("section")
        .id(ids::APP_VIEW)
        .flag("hidden")
        .child(el("button").id(ids::LOGOUT_BUTTON).text("Logout"))
        .child(el("h2").text("Feed"))
        .child(upload)
        .child(el("div").id(ids::FEED));

    el("div").class("media-feed").child(auth_view).child(app_view)
}

/// A fresh feed fragment; the caller replaces whatever was shown before.
pub fn render_feed(posts: &[Post]) -> Element {
    let feed = el("div").class(FEED_CLASS);

    if posts.is_empty() {
        return feed.child(el("p").class(EMPTY_FEED_CLASS).text(EMPTY_FEED_MESSAGE));
    }

    feed.children(posts.iter().map(render_post))
}

pub fn render_post(post: &Post) -> Element {
    let author = post.email.as_deref().unwrap_or(UNKNOWN_AUTHOR);

    let header = el("div")
        .class("post-header")
        .child(el("span").class("post-author").text(author))
        .child(
            el("span")
                .class("post-date")
                .text(format_timestamp(&post.created_at)),
        );

    let mut block = el("div")
        .class(POST_CLASS)
        .child(header)
        .child(media_element(post))
        .child(el("p").class("post-caption").text(post.caption.as_str()));

    if post.is_owner {
        block = block.child(
            el("button")
                .class(DELETE_CLASS)
                .attr(POST_ID_ATTRIBUTE, post.id.as_str())
                .text("Delete"),
        );
    }

    block
}

fn media_element(post: &Post) -> Element {
    match post.file_type {
        MediaKind::Video => el("video")
            .class("post-media")
            .attr("src", post.url.as_str())
            .flag("controls"),
        MediaKind::Image => el("img")
            .class("post-media")
            .attr("src", post.url.as_str())
            .attr("alt", post.caption.as_str()),
    }
}

pub fn render_error(message: &str) -> Element {
    el("div")
        .class(FEED_CLASS)
        .child(el("p").class(FEED_ERROR_CLASS).text(message))
}

/// Falls back to the raw string when it is not a timestamp we understand.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.format(TIMESTAMP_FORMAT).to_string();
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_owned())
}
