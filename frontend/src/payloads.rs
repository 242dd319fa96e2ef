use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::post::Feed;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct FeedResponse {
    pub posts: Feed,
}

/// New accounts are always requested active, unprivileged and unverified.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RegisterPayload<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub is_active: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
}

impl<'a> RegisterPayload<'a> {
    pub fn new(email: &'a str, password: &'a str) -> Self {
        RegisterPayload {
            email,
            password,
            is_active: true,
            is_superuser: false,
            is_verified: false,
        }
    }
}

/// Pulls the human readable message out of a `{"detail": ...}` error body.
///
/// `detail` is either a plain string or, for request validation failures, a
/// list of `{"msg": ...}` objects whose messages are joined.
pub fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();

            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
