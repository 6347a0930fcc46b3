// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the token cache, executor, and callback envelope.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::QywxError;

/// The identity on whose behalf a token is requested.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    /// A corp using its own app secret.
    Corp,
    /// A third-party suite using its secret and the platform-pushed ticket.
    Suite,
    /// A corp that authorized a suite; its token is minted through the suite.
    AuthorizedCorp,
}

/// The result of one successful credential fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedToken {
    /// The opaque token value.
    pub value: String,
    /// Validity window reported by the platform.
    pub expires_in: Duration,
}

/// A cached token and the absolute instant it stops being valid.
///
/// A state is valid iff `value` is non-empty and `now < expires_at`.
/// States are only ever replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenState {
    value: String,
    expires_at: DateTime<Utc>,
}

impl TokenState {
    /// Builds a state from a fetch that completed at `fetched_at`.
    pub fn from_fetch(token: FetchedToken, fetched_at: DateTime<Utc>) -> Self {
        let ttl = chrono::Duration::from_std(token.expires_in).unwrap_or(chrono::Duration::zero());
        Self {
            value: token.value,
            expires_at: fetched_at + ttl,
        }
    }

    /// The empty state every cache starts in and returns to on invalidation.
    pub fn invalid() -> Self {
        Self {
            value: String::new(),
            expires_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    /// Returns the token value (empty when invalid).
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the absolute expiry instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Checks validity at `now`, treating the last `margin` of the window as expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        if self.value.is_empty() {
            return false;
        }
        let margin = chrono::Duration::from_std(margin).unwrap_or(chrono::Duration::zero());
        now + margin < self.expires_at
    }
}

impl Default for TokenState {
    fn default() -> Self {
        Self::invalid()
    }
}

/// The `{errcode, errmsg}` pair embedded in every platform response body.
///
/// Missing fields default to success, since token endpoints omit them on
/// some deployments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApplicationStatus {
    /// Zero means success.
    #[serde(rename = "errcode", default)]
    pub code: i64,
    /// Human-readable message from the platform.
    #[serde(rename = "errmsg", default)]
    pub message: String,
}

impl ApplicationStatus {
    /// Status code for success.
    pub const OK: i64 = 0;

    /// Decodes the status from a JSON response body.
    pub fn from_json(body: &[u8]) -> Result<Self, QywxError> {
        serde_json::from_slice(body)
            .map_err(|e| QywxError::decode("response body is not a status-bearing JSON object", e))
    }

    /// Returns true if the call succeeded.
    pub fn is_ok(&self) -> bool {
        self.code == Self::OK
    }

    /// Converts a non-zero status into an [`QywxError::Application`].
    pub fn into_result(self) -> Result<(), QywxError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(QywxError::Application {
                code: self.code,
                message: self.message,
            })
        }
    }
}
