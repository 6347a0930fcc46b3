// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: paired credentials, key lengths, URL schemes, and timeouts.

use crate::diagnostic::ConfigError;
use crate::model::QywxConfig;

/// Length of a platform EncodingAESKey (base64 of 32 bytes, padding dropped).
pub const ENCODING_AES_KEY_LEN: usize = 43;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &QywxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // A secret without the id it belongs to can never mint a token.
    if config.corp.corp_secret.is_some() && is_blank(config.corp.corp_id.as_deref()) {
        errors.push(validation("corp.corp_id must be set when corp.corp_secret is set"));
    }

    if config.suite.suite_secret.is_some() && is_blank(config.suite.suite_id.as_deref()) {
        errors.push(validation(
            "suite.suite_id must be set when suite.suite_secret is set",
        ));
    }

    if let Some(key) = config.callback.encoding_aes_key.as_deref()
        && key.len() != ENCODING_AES_KEY_LEN
    {
        errors.push(validation(format!(
            "callback.encoding_aes_key must be {ENCODING_AES_KEY_LEN} characters, got {}",
            key.len()
        )));
    }

    if config.callback.encoding_aes_key.is_some() && is_blank(config.callback.token.as_deref()) {
        errors.push(validation(
            "callback.token must be set when callback.encoding_aes_key is set",
        ));
    }

    let base_url = config.api.base_url.trim();
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        errors.push(validation(format!(
            "api.base_url `{base_url}` must be an http(s) URL"
        )));
    }

    if config.api.attempt_timeout_secs == 0 {
        errors.push(validation("api.attempt_timeout_secs must be at least 1"));
    }

    if config.api.call_timeout_secs < config.api.attempt_timeout_secs {
        errors.push(validation(format!(
            "api.call_timeout_secs ({}) must not be shorter than api.attempt_timeout_secs ({})",
            config.api.call_timeout_secs, config.api.attempt_timeout_secs
        )));
    }

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(validation(format!(
            "log.level `{}` must be one of {}",
            config.log.level,
            LOG_LEVELS.join(", ")
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}
