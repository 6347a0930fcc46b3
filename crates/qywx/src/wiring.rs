// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds transports, caches and executors from configuration.

use std::sync::Arc;
use std::time::Duration;

use qywx_client::{AuthPolicy, HttpTransport, RetryingExecutor};
use qywx_config::QywxConfig;
use qywx_core::{CredentialFetcher, QywxError};
use qywx_token::TokenCache;

/// Creates the HTTP transport described by `[api]`.
pub fn transport(config: &QywxConfig) -> Result<HttpTransport, QywxError> {
    HttpTransport::new(
        &config.api.base_url,
        Duration::from_secs(config.api.attempt_timeout_secs),
        &config.api.user_agent,
    )
}

/// Creates an executor for `fetcher`'s principal with the configured
/// expiry margin and call deadline.
pub fn executor(
    config: &QywxConfig,
    transport: HttpTransport,
    fetcher: Arc<dyn CredentialFetcher>,
) -> RetryingExecutor {
    let policy = AuthPolicy::for_principal(fetcher.principal());
    let cache = TokenCache::new(fetcher)
        .with_expiry_margin(Duration::from_secs(config.token.expiry_margin_secs));
    RetryingExecutor::new(transport, Arc::new(cache), policy)
        .with_call_timeout(Duration::from_secs(config.api.call_timeout_secs))
}

/// Returns the value of a required configuration key.
pub fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str, QywxError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| QywxError::Config(format!("`{key}` is not set")))
}

/// Every secret in `config`, for log redaction.
pub fn secrets(config: &QywxConfig) -> Vec<String> {
    [
        &config.corp.corp_secret,
        &config.suite.suite_secret,
        &config.suite.suite_ticket,
        &config.callback.token,
        &config.callback.encoding_aes_key,
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .cloned()
    .collect()
}
