// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated request pipeline for the enterprise messaging API.
//!
//! [`RetryingExecutor`] attaches the principal's token to each request,
//! decodes the application status the platform embeds in every response
//! body, and on a credential-failure code refreshes the token and replays
//! the request exactly once. [`AuthPolicy`] parameterizes the executor per
//! principal type.

pub mod executor;
pub mod fetcher;
pub mod policy;
pub mod request;
pub mod transport;

pub use executor::RetryingExecutor;
pub use fetcher::{AuthorizedCorpTokenFetcher, CorpTokenFetcher, SuiteTokenFetcher};
pub use policy::AuthPolicy;
pub use request::{ApiRequest, ApiResponse};
pub use transport::HttpTransport;

pub use reqwest::Method;
