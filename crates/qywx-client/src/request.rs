// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response values passed through the executor.

use std::borrow::Cow;

use qywx_core::QywxError;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Content type of JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// An already-serialized request body.
///
/// Bodies are encoded once when the request is built, so a replay sends the
/// same bytes as the original attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// One logical API call, without its token.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl ApiRequest {
    /// Creates a request with no body. `path` is joined to the base URL and
    /// may carry its own query string.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A `POST` request with `body` serialized as JSON.
    pub fn post_json<T: Serialize + ?Sized>(
        path: impl Into<String>,
        body: &T,
    ) -> Result<Self, QywxError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| QywxError::Internal(format!("failed to serialize request body: {e}")))?;
        Ok(Self::new(Method::POST, path).with_body(JSON_CONTENT_TYPE, bytes))
    }

    /// A `POST` request with a raw body, e.g. a multipart upload built by the caller.
    pub fn post_bytes(
        path: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self::new(Method::POST, path).with_body(content_type, bytes)
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.body = Some(RequestBody {
            content_type: content_type.into(),
            bytes,
        });
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }
}

/// A 2xx response as received from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Returns true if the body is a download rather than a status-bearing
    /// document. Such bodies skip application status decoding.
    pub fn is_media(&self) -> bool {
        let Some(content_type) = self.content_type.as_deref() else {
            return false;
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        !(mime == "application/json" || mime.ends_with("+json") || mime == "text/plain")
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, QywxError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| QywxError::decode("failed to parse response body", e))
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
