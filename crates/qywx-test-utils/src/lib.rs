// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for qywx integration tests.
//!
//! Provides deterministic stand-ins for the client's external capabilities so
//! tests run without the platform or a real cipher.
//!
//! # Components
//!
//! - [`CountingFetcher`] - Credential fetcher that counts calls and can fail on demand
//! - [`MockCrypter`] - Reversible, non-cryptographic message crypter
//! - [`ManualClock`] - Clock that only moves when told to
//! - [`fixtures`] - Plaintext callback payloads

pub mod clock;
pub mod crypter;
pub mod fetcher;
pub mod fixtures;

pub use clock::ManualClock;
pub use crypter::MockCrypter;
pub use fetcher::CountingFetcher;
