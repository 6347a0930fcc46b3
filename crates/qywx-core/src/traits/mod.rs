// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits consumed by the core services.
//!
//! Each principal type supplies its own [`CredentialFetcher`], selected when
//! the token cache is built. Callback crypto is consumed through
//! [`MessageCrypter`]; time through [`Clock`].

pub mod clock;
pub mod crypter;
pub mod fetcher;

pub use clock::{Clock, SystemClock};
pub use crypter::{Decrypted, MessageCrypter};
pub use fetcher::CredentialFetcher;
