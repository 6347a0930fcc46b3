// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the qywx client.

use thiserror::Error;

use crate::types::PrincipalKind;

/// Boxed error source carried by transport and decode failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across the token cache, the retrying
/// executor, and the callback envelope.
#[derive(Debug, Error)]
pub enum QywxError {
    /// Configuration errors (missing credentials, malformed keys, bad URLs).
    #[error("configuration error: {0}")]
    Config(String),

    /// Network failure or non-2xx HTTP status. Never retried by the executor.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
        source: Option<BoxError>,
    },

    /// Non-zero application status that is not a credential failure.
    #[error("application error {code}: {message}")]
    Application { code: i64, message: String },

    /// The credential fetcher failed while minting a token.
    #[error("failed to refresh {principal} token: {source}")]
    CredentialRefresh {
        principal: PrincipalKind,
        source: Box<QywxError>,
    },

    /// A response or callback payload could not be decoded.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        source: Option<BoxError>,
    },

    /// The callback signature did not match the recomputed one.
    #[error("callback signature mismatch")]
    SignatureMismatch,

    /// The callback ciphertext could not be decrypted.
    #[error("decryption error: {message}")]
    Decryption {
        message: String,
        source: Option<BoxError>,
    },

    /// The decrypted owner id differs from this instance's principal id.
    #[error("callback addressed to `{actual}`, expected `{expected}`")]
    TenantMismatch { expected: String, actual: String },

    /// The callback discriminator named a kind this client does not know.
    #[error("unknown message type: {kind}")]
    UnknownMessageType { kind: String },

    /// Caller-supplied deadline elapsed.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`QywxError`] for callers that route on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    /// Network or HTTP status failure.
    Transport,
    /// Platform rejected the call with a non-credential code.
    Application,
    /// Token minting failed.
    Credential,
    /// Signature or decryption failure on a callback. Drop the request.
    Integrity,
    /// Misconfiguration or tenant mismatch; needs an operator.
    Configuration,
    /// Payload shape the client does not understand (protocol drift).
    Protocol,
    /// Deadline or internal failure.
    Internal,
}

impl QywxError {
    /// Returns the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::Application { .. } => ErrorCategory::Application,
            Self::CredentialRefresh { .. } => ErrorCategory::Credential,
            Self::SignatureMismatch | Self::Decryption { .. } => ErrorCategory::Integrity,
            Self::Config(_) | Self::TenantMismatch { .. } => ErrorCategory::Configuration,
            Self::Decode { .. } | Self::UnknownMessageType { .. } => ErrorCategory::Protocol,
            Self::Timeout { .. } | Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Shorthand for a decode error wrapping its cause.
    pub fn decode<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the application status code if this is an application error,
    /// looking through a credential-refresh wrapper.
    pub fn application_code(&self) -> Option<i64> {
        match self {
            Self::Application { code, .. } => Some(*code),
            Self::CredentialRefresh { source, .. } => source.application_code(),
            _ => None,
        }
    }
}
