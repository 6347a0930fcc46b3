// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-attempt HTTP transport.
//!
//! Sends one request and maps connection failures and non-2xx statuses to
//! [`QywxError::Transport`]. Knows nothing about tokens beyond appending a
//! query parameter it is handed.

use std::time::Duration;

use qywx_core::QywxError;
use qywx_security::redact_url;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::request::{ApiRequest, ApiResponse};

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    attempt_timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport for `base_url`, bounding every attempt by
    /// `attempt_timeout`.
    pub fn new(
        base_url: &str,
        attempt_timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, QywxError> {
        Url::parse(base_url)
            .map_err(|e| QywxError::Config(format!("invalid API base URL `{base_url}`: {e}")))?;

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(attempt_timeout)
            .build()
            .map_err(|e| QywxError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            attempt_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the full URL for `request`, with `token` appended last.
    ///
    /// The caller's path and query are kept verbatim; only the token pair is
    /// added, so two URLs for the same request differ only in that pair.
    pub fn url_for(
        &self,
        request: &ApiRequest,
        token: Option<(&str, &str)>,
    ) -> Result<Url, QywxError> {
        let raw = format!("{}{}", self.base_url, request.path());
        let mut url = Url::parse(&raw)
            .map_err(|e| QywxError::Config(format!("invalid request path `{}`: {e}", request.path())))?;

        if !request.query_pairs().is_empty() || token.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in request.query_pairs() {
                pairs.append_pair(key, value);
            }
            if let Some((param, value)) = token {
                pairs.append_pair(param, value);
            }
        }

        Ok(url)
    }

    /// Sends one attempt of `request`.
    pub async fn send(
        &self,
        request: &ApiRequest,
        token: Option<(&str, &str)>,
    ) -> Result<ApiResponse, QywxError> {
        let url = self.url_for(request, token)?;
        let redacted = redact_url(url.as_str());
        debug!(method = %request.method(), url = %redacted, "sending request");

        let mut builder = self.client.request(request.method().clone(), url);
        if let Some(body) = request.body() {
            builder = builder
                .header(CONTENT_TYPE, body.content_type.as_str())
                .body(body.bytes.clone());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                QywxError::Timeout {
                    duration: self.attempt_timeout,
                }
            } else {
                QywxError::Transport {
                    message: format!("HTTP request to {redacted} failed"),
                    status: None,
                    source: Some(Box::new(e.without_url())),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, url = %redacted, "non-success HTTP status");
            return Err(QywxError::Transport {
                message: format!("{redacted} returned {status}: {body}"),
                status: Some(status.as_u16()),
                source: None,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(|e| QywxError::Transport {
            message: format!("failed to read response body from {redacted}"),
            status: Some(status.as_u16()),
            source: Some(Box::new(e.without_url())),
        })?;

        Ok(ApiResponse {
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}
