// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared cell for the rotating suite ticket.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// The latest suite ticket pushed by the platform.
///
/// Clones share the same cell, so the callback handler that receives a
/// ticket push and the fetcher that mints suite tokens see the same value
/// without either being rebuilt.
#[derive(Clone, Default)]
pub struct SuiteTicket {
    inner: Arc<ArcSwapOption<String>>,
}

impl SuiteTicket {
    /// Creates a cell holding an optional initial ticket.
    pub fn new(initial: Option<String>) -> Self {
        Self {
            inner: Arc::new(ArcSwapOption::from(initial.map(Arc::new))),
        }
    }

    /// Replaces the ticket.
    pub fn set(&self, ticket: impl Into<String>) {
        self.inner.store(Some(Arc::new(ticket.into())));
    }

    /// Returns the current ticket, if one has been received.
    pub fn get(&self) -> Option<Arc<String>> {
        self.inner.load_full()
    }
}

impl fmt::Debug for SuiteTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteTicket")
            .field("ticket", &self.get().map(|_| "[redacted]"))
            .finish()
    }
}
