//! JSON-over-HTTP client for the first-party session backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): the transport reports itself unavailable, since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every non-2xx status becomes a typed [`HttpError`]; transport failures are
//! logged and replaced by the opaque [`ApiError::Transport`].

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{ApiError, HttpError, TransportError};

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// HTTP verbs used against the session backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A fully resolved request handed to a [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Value of the first header matching `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a backend response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request/response mechanics behind [`SessionClient`].
///
/// Futures are not `Send`: the browser event loop is single-threaded.
#[async_trait::async_trait(?Send)]
pub trait Transport: Send + Sync {
    /// Send one request and return whatever response arrived.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response was received at all.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Browser `fetch` transport backed by `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[async_trait::async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        #[cfg(feature = "hydrate")]
        {
            let mut builder = match request.method {
                Method::Get => gloo_net::http::Request::get(&request.url),
                Method::Post => gloo_net::http::Request::post(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let outgoing = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError(e.to_string()))?;
            let response = outgoing.send().await.map_err(|e| TransportError(e.to_string()))?;
            let status = response.status();
            let body = response.text().await.map_err(|e| TransportError(e.to_string()))?;
            Ok(HttpResponse { status, body })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(TransportError("not available on server".to_owned()))
        }
    }
}

/// Typed JSON client for `/api/...` endpoints.
///
/// Cheap to clone; the transport is shared.
#[derive(Clone)]
pub struct SessionClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl SessionClient {
    /// Create a client resolving paths against `base_url` (empty for same-origin).
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self { transport, base_url: base_url.into().trim_end_matches('/').to_owned() }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET path`, decoding the JSON body as `T`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str, headers: &[(&str, &str)]) -> Result<T, ApiError> {
        self.request(Method::Get, path, None, headers).await
    }

    /// `POST path` with `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.request(Method::Post, path, Some(body), headers).await
    }

    /// `POST path` without a request body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str, headers: &[(&str, &str)]) -> Result<T, ApiError> {
        self.request(Method::Post, path, None, headers).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        headers: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let request = build_request(method, self.url(path), body, headers);
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                leptos::logging::warn!("{method:?} {path} failed: {e}");
                return Err(ApiError::Transport);
            }
        };

        if !response.is_success() {
            return Err(HttpError::from_response(response.status, &response.body).into());
        }
        decode_body(&response.body)
    }
}

/// Assemble a request, forcing `Content-Type: application/json`.
pub(crate) fn build_request(
    method: Method,
    url: String,
    body: Option<String>,
    headers: &[(&str, &str)],
) -> HttpRequest {
    let mut merged: Vec<(String, String)> = headers
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("content-type"))
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    merged.push(("Content-Type".to_owned(), CONTENT_TYPE_JSON.to_owned()));
    HttpRequest { method, url, headers: merged, body }
}

/// Decode a 2xx body; an empty body reads as JSON `null`.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}
