use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::payloads::{error_detail, FeedResponse, RegisterPayload, TokenResponse};
use crate::post::Feed;

pub const LOGIN_PATH: &str = "/auth/jwt/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const FEED_PATH: &str = "/feed";
pub const UPLOAD_PATH: &str = "/upload";
pub const DELETE_PATH: &str = "/delete";

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// Request body, generic over the platform's file handle so the multipart
/// upload can carry a browser `File` without the core depending on it.
#[derive(Clone, Debug, PartialEq)]
pub enum Body<F> {
    Empty,
    Form(Vec<(String, String)>),
    Json(Value),
    Multipart { file: F, caption: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest<F> {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Body<F>,
}

impl<F> ApiRequest<F> {
    pub fn login(email: &str, password: &str) -> Self {
        ApiRequest {
            method: Method::Post,
            path: LOGIN_PATH.to_owned(),
            bearer: None,
            body: Body::Form(vec![
                ("username".to_owned(), email.to_owned()),
                ("password".to_owned(), password.to_owned()),
            ]),
        }
    }

    pub fn register(email: &str, password: &str) -> Result<Self, serde_json::Error> {
        let payload = serde_json::to_value(RegisterPayload::new(email, password))?;

        Ok(ApiRequest {
            method: Method::Post,
            path: REGISTER_PATH.to_owned(),
            bearer: None,
            body: Body::Json(payload),
        })
    }

    pub fn feed(token: &str) -> Self {
        ApiRequest {
            method: Method::Get,
            path: FEED_PATH.to_owned(),
            bearer: Some(token.to_owned()),
            body: Body::Empty,
        }
    }

    pub fn upload(token: &str, file: F, caption: &str) -> Self {
        ApiRequest {
            method: Method::Post,
            path: UPLOAD_PATH.to_owned(),
            bearer: Some(token.to_owned()),
            body: Body::Multipart {
                file,
                caption: caption.to_owned(),
            },
        }
    }

    pub fn delete(token: &str, post_id: &str) -> Self {
        ApiRequest {
            method: Method::Delete,
            path: format!(
                "{}/{}",
                DELETE_PATH,
                utf8_percent_encode(post_id, PATH_SEGMENT)
            ),
            bearer: Some(token.to_owned()),
            body: Body::Empty,
        }
    }

    /// `base_url` is expected without a trailing slash, see
    /// [`crate::config::normalize_base_url`].
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.path)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn detail(&self) -> Option<String> {
        error_detail(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// No response could be obtained at all (connection refused, CORS, offline).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized { detail: Option<String> },
    #[error("request rejected with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not encode request body: {0}")]
    Encode(serde_json::Error),
}

impl ApiError {
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail } | ApiError::Rejected { detail, .. } => {
                detail.as_deref()
            }
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Encode(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

#[allow(async_fn_in_trait)]
pub trait Transport {
    type File;

    async fn send(&self, request: ApiRequest<Self::File>) -> Result<ApiResponse, TransportError>;
}

/// Typed access to the five backend calls over any [`Transport`].
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        ApiClient { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call(&self, request: ApiRequest<T::File>) -> Result<ApiResponse, ApiError> {
        debug!("{} {}", request.method.as_str(), request.path);

        let response = self.transport.send(request).await?;
        debug!("response status {}", response.status);

        if response.status == 401 {
            return Err(ApiError::Unauthorized {
                detail: response.detail(),
            });
        }

        if !response.is_success() {
            return Err(ApiError::Rejected {
                status: response.status,
                detail: response.detail(),
            });
        }

        Ok(response)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let response = self.call(ApiRequest::login(email, password)).await?;
        let token: TokenResponse = response.json()?;

        if token.access_token.is_empty() {
            return Err(ApiError::Rejected {
                status: response.status,
                detail: None,
            });
        }

        Ok(token.access_token)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let request = ApiRequest::register(email, password).map_err(ApiError::Encode)?;
        self.call(request).await?;
        Ok(())
    }

    pub async fn feed(&self, token: &str) -> Result<Feed, ApiError> {
        let response = self.call(ApiRequest::feed(token)).await?;
        let feed: FeedResponse = response.json()?;

        Ok(feed.posts)
    }

    pub async fn upload(&self, token: &str, file: T::File, caption: &str) -> Result<(), ApiError> {
        self.call(ApiRequest::upload(token, file, caption)).await?;
        Ok(())
    }

    pub async fn delete(&self, token: &str, post_id: &str) -> Result<(), ApiError> {
        self.call(ApiRequest::delete(token, post_id)).await?;
        Ok(())
    }
}
