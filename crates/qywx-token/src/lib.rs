// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token lifecycle for the qywx client.
//!
//! [`TokenCache`] serves a cached token while it is valid and serializes
//! refreshes so concurrent callers share one fetch. [`SuiteTicket`] holds
//! the platform-pushed ticket suite tokens are minted from.

pub mod cache;
pub mod ticket;

pub use cache::TokenCache;
pub use ticket::SuiteTicket;
