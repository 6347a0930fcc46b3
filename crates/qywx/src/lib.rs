// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the enterprise messaging platform's API.
//!
//! Wires the token cache, retrying executor and callback envelope together
//! per principal:
//!
//! - [`CorpApi`] - a corp calling with its own app secret
//! - [`SuiteApi`] - a third-party suite, fed tickets by its callback endpoint
//! - [`AuthorizedCorpApi`] - a corp that authorized a suite
//!
//! ```no_run
//! # async fn run() -> Result<(), qywx::QywxError> {
//! let config = qywx_config::load_and_validate_str(
//!     "[corp]\ncorp_id = \"wx1\"\ncorp_secret = \"s\"\n",
//! )
//! .map_err(|e| qywx::QywxError::Config(format!("{} configuration errors", e.len())))?;
//! let corp = qywx::CorpApi::from_config(&config)?;
//! let request = qywx::ApiRequest::get("/cgi-bin/user/get").query("userid", "zhangsan");
//! let user: serde_json::Value = corp.execute_json(&request).await?;
//! println!("{user}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod wiring;

pub use api::{AuthorizedCorpApi, CorpApi, SuiteApi};

pub use qywx_callback::{CallbackEnvelope, CallbackEvent, ReplyMessage};
pub use qywx_client::{ApiRequest, ApiResponse, AuthPolicy, Method, RetryingExecutor};
pub use qywx_core::{ErrorCategory, PrincipalKind, QywxError};
pub use qywx_token::{SuiteTicket, TokenCache};
