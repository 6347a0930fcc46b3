// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the qywx enterprise messaging client.
//!
//! This crate provides the error taxonomy, the token and status types, and
//! the capability traits that the token cache, the retrying executor, and
//! the callback envelope are built against. Concrete network fetchers and
//! message crypters live in other crates and plug in through these traits.

pub mod error;
pub mod recording;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorCategory, QywxError};
pub use types::{ApplicationStatus, FetchedToken, PrincipalKind, TokenState};

pub use traits::{Clock, CredentialFetcher, Decrypted, MessageCrypter, SystemClock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qywx_error_has_all_variants() {
        let _config = QywxError::Config("test".into());
        let _transport = QywxError::Transport {
            message: "test".into(),
            status: Some(502),
            source: None,
        };
        let _app = QywxError::Application {
            code: 60011,
            message: "no privilege".into(),
        };
        let _refresh = QywxError::CredentialRefresh {
            principal: PrincipalKind::Suite,
            source: Box::new(QywxError::Internal("test".into())),
        };
        let _decode = QywxError::Decode {
            message: "test".into(),
            source: None,
        };
        let _sig = QywxError::SignatureMismatch;
        let _decrypt = QywxError::Decryption {
            message: "test".into(),
            source: None,
        };
        let _tenant = QywxError::TenantMismatch {
            expected: "a".into(),
            actual: "b".into(),
        };
        let _unknown = QywxError::UnknownMessageType {
            kind: "sticker".into(),
        };
        let _timeout = QywxError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = QywxError::Internal("test".into());
    }

    #[test]
    fn principal_kind_has_three_variants() {
        use std::str::FromStr;

        let variants = [
            PrincipalKind::Corp,
            PrincipalKind::Suite,
            PrincipalKind::AuthorizedCorp,
        ];

        for variant in &variants {
            let s = variant.to_string();
            let parsed = PrincipalKind::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_fetcher<T: CredentialFetcher>() {}
        fn _assert_crypter<T: MessageCrypter>() {}
        fn _assert_clock<T: Clock>() {}
        _assert_clock::<SystemClock>();
    }
}
