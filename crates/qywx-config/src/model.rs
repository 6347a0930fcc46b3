// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the qywx client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level qywx configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QywxConfig {
    /// Direct corp credentials.
    #[serde(default)]
    pub corp: CorpConfig,

    /// Third-party suite credentials.
    #[serde(default)]
    pub suite: SuiteConfig,

    /// Callback envelope keys.
    #[serde(default)]
    pub callback: CallbackConfig,

    /// API endpoint and timeout settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Token cache settings.
    #[serde(default)]
    pub token: TokenConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Credentials for a corp calling the API with its own app secret.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorpConfig {
    /// Corp id (`corpid`).
    #[serde(default)]
    pub corp_id: Option<String>,

    /// App secret (`corpsecret`).
    #[serde(default)]
    pub corp_secret: Option<String>,

    /// Agent id of the app, when callbacks are agent-scoped.
    #[serde(default)]
    pub agent_id: Option<i64>,
}

impl fmt::Debug for CorpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorpConfig")
            .field("corp_id", &self.corp_id)
            .field("corp_secret", &self.corp_secret.as_ref().map(|_| "[redacted]"))
            .field("agent_id", &self.agent_id)
            .finish()
    }
}

/// Credentials for a third-party suite.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    /// Suite id.
    #[serde(default)]
    pub suite_id: Option<String>,

    /// Suite secret.
    #[serde(default)]
    pub suite_secret: Option<String>,

    /// Initial suite ticket. The platform pushes fresh tickets by callback.
    #[serde(default)]
    pub suite_ticket: Option<String>,
}

impl fmt::Debug for SuiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteConfig")
            .field("suite_id", &self.suite_id)
            .field("suite_secret", &self.suite_secret.as_ref().map(|_| "[redacted]"))
            .field("suite_ticket", &self.suite_ticket.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Keys used to verify and decrypt callbacks.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CallbackConfig {
    /// Signing token configured on the platform's callback page.
    #[serde(default)]
    pub token: Option<String>,

    /// 43-character EncodingAESKey.
    #[serde(default)]
    pub encoding_aes_key: Option<String>,

    /// Owner id expected inside decrypted payloads. Defaults to the
    /// principal's own id (corp id or suite id).
    #[serde(default)]
    pub receiver_id: Option<String>,
}

impl fmt::Debug for CallbackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackConfig")
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field(
                "encoding_aes_key",
                &self.encoding_aes_key.as_ref().map(|_| "[redacted]"),
            )
            .field("receiver_id", &self.receiver_id)
            .finish()
    }
}

/// API endpoint and deadline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL all API paths are joined to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deadline for a single HTTP attempt.
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,

    /// Deadline for one logical call, covering the original and the replay.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            attempt_timeout_secs: default_attempt_timeout_secs(),
            call_timeout_secs: default_call_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://qyapi.weixin.qq.com".to_string()
}

fn default_attempt_timeout_secs() -> u64 {
    10
}

fn default_call_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("qywx/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Token cache configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    /// Seconds shaved off every token's validity window to absorb clock skew.
    #[serde(default)]
    pub expiry_margin_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
