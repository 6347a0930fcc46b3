// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock credential fetcher for deterministic cache tests.
//!
//! `CountingFetcher` mints `"{principal}-token-{n}"` on the n-th call, so a
//! test can tell from the token value alone how many fetches happened.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use qywx_core::{CredentialFetcher, FetchedToken, PrincipalKind, QywxError};

/// A credential fetcher that counts calls and fails on demand.
#[derive(Debug)]
pub struct CountingFetcher {
    principal: PrincipalKind,
    ttl: Duration,
    delay: Duration,
    calls: AtomicUsize,
    failures: AtomicUsize,
}

impl CountingFetcher {
    /// Creates a fetcher minting tokens valid for two hours.
    pub fn new(principal: PrincipalKind) -> Self {
        Self {
            principal,
            ttl: Duration::from_secs(7200),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    /// Sets the validity window of minted tokens.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Makes every fetch sleep before completing, widening race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes the next `n` fetches fail with a transport error.
    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Number of fetches performed so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialFetcher for CountingFetcher {
    fn principal(&self) -> PrincipalKind {
        self.principal
    }

    async fn fetch(&self) -> Result<FetchedToken, QywxError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let should_fail = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |f| f.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(QywxError::Transport {
                message: format!("injected failure on fetch {n}"),
                status: None,
                source: None,
            });
        }

        Ok(FetchedToken {
            value: format!("{}-token-{n}", self.principal),
            expires_in: self.ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_and_fails_on_demand() {
        let fetcher = CountingFetcher::new(PrincipalKind::Corp);
        fetcher.fail_next(1);

        assert!(fetcher.fetch().await.is_err());
        let token = fetcher.fetch().await.unwrap();
        assert_eq!(token.value, "corp-token-2");
        assert_eq!(fetcher.calls(), 2);
    }
}
