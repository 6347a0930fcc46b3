// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-flight token cache.
//!
//! Reads go through an [`ArcSwap`] and never block. When the cached state is
//! invalid, callers serialize on a refresh guard and re-check the state after
//! acquiring it, so N concurrent callers that observe expiry trigger one fetch.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use qywx_core::recording;
use qywx_core::{Clock, CredentialFetcher, PrincipalKind, QywxError, SystemClock, TokenState};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Caches the token of one principal and refreshes it on demand.
pub struct TokenCache {
    fetcher: Arc<dyn CredentialFetcher>,
    clock: Arc<dyn Clock>,
    expiry_margin: Duration,
    state: ArcSwap<TokenState>,
    refresh_guard: Mutex<()>,
}

impl TokenCache {
    /// Creates an empty cache backed by `fetcher` and the system clock.
    pub fn new(fetcher: Arc<dyn CredentialFetcher>) -> Self {
        Self::with_clock(fetcher, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(fetcher: Arc<dyn CredentialFetcher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            fetcher,
            clock,
            expiry_margin: Duration::ZERO,
            state: ArcSwap::from_pointee(TokenState::invalid()),
            refresh_guard: Mutex::new(()),
        }
    }

    /// Treats the last `margin` of every validity window as already expired.
    pub fn with_expiry_margin(mut self, margin: Duration) -> Self {
        self.expiry_margin = margin;
        self
    }

    /// The principal this cache holds tokens for.
    pub fn principal(&self) -> PrincipalKind {
        self.fetcher.principal()
    }

    /// Returns the current state without refreshing.
    pub fn snapshot(&self) -> TokenState {
        TokenState::clone(&self.state.load())
    }

    /// Returns a valid token, fetching one if the cached state is invalid.
    ///
    /// A failed fetch is returned to the caller and leaves the previous
    /// state in place.
    pub async fn get(&self) -> Result<String, QywxError> {
        if let Some(token) = self.cached() {
            return Ok(token);
        }

        let _guard = self.refresh_guard.lock().await;
        if let Some(token) = self.cached() {
            debug!(principal = %self.principal(), "token refreshed by concurrent caller");
            return Ok(token);
        }

        self.fetch_and_store().await
    }

    /// Marks the cached state invalid so the next [`get`](Self::get) fetches.
    pub fn invalidate(&self) {
        debug!(principal = %self.principal(), "token invalidated");
        self.state.store(Arc::new(TokenState::invalid()));
    }

    /// Fetches a new token regardless of the cached state.
    ///
    /// Serialized with [`get`](Self::get), so a forced refresh never races a
    /// lazy one.
    pub async fn refresh(&self) -> Result<String, QywxError> {
        let _guard = self.refresh_guard.lock().await;
        self.fetch_and_store().await
    }

    /// Replaces a token the server rejected.
    ///
    /// Fetches only while `rejected` is still the cached value; if a
    /// concurrent caller already replaced it, the newer token is returned.
    pub async fn refresh_rejected(&self, rejected: &str) -> Result<String, QywxError> {
        let _guard = self.refresh_guard.lock().await;
        if self.state.load().value() != rejected
            && let Some(token) = self.cached()
        {
            debug!(principal = %self.principal(), "rejected token already replaced");
            return Ok(token);
        }

        self.state.store(Arc::new(TokenState::invalid()));
        self.fetch_and_store().await
    }

    fn cached(&self) -> Option<String> {
        let state = self.state.load();
        state
            .is_valid_at(self.clock.now(), self.expiry_margin)
            .then(|| state.value().to_string())
    }

    // Caller must hold `refresh_guard`.
    async fn fetch_and_store(&self) -> Result<String, QywxError> {
        let principal = self.principal();
        match self.fetcher.fetch().await {
            Ok(token) => {
                let state = TokenState::from_fetch(token, self.clock.now());
                info!(
                    principal = %principal,
                    expires_at = %state.expires_at(),
                    "token refreshed"
                );
                let value = state.value().to_string();
                self.state.store(Arc::new(state));
                recording::record_refresh(principal, true);
                Ok(value)
            }
            Err(e) => {
                warn!(principal = %principal, error = %e, "token refresh failed");
                recording::record_refresh(principal, false);
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("principal", &self.principal())
            .field("expires_at", &self.state.load().expires_at())
            .field("expiry_margin", &self.expiry_margin)
            .finish()
    }
}
