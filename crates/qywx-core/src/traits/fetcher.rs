// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential fetcher trait: the one-shot call that mints a fresh token.

use async_trait::async_trait;

use crate::error::QywxError;
use crate::types::{FetchedToken, PrincipalKind};

/// Mints a fresh token for one principal from its stored credentials.
///
/// Implementations perform exactly one remote call per invocation and do
/// not retry; retry policy belongs to the executor.
#[async_trait]
pub trait CredentialFetcher: Send + Sync + 'static {
    /// The principal type this fetcher mints tokens for.
    fn principal(&self) -> PrincipalKind;

    /// Performs the fetch and returns the token with its validity window.
    async fn fetch(&self) -> Result<FetchedToken, QywxError>;
}
