// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential fetchers for the three principal types.
//!
//! Each fetcher performs the one-shot call that mints a token. None of them
//! retries; retry policy belongs to the executor.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use qywx_core::{ApplicationStatus, CredentialFetcher, FetchedToken, PrincipalKind, QywxError};
use qywx_token::SuiteTicket;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::executor::RetryingExecutor;
use crate::request::{ApiRequest, ApiResponse};
use crate::transport::HttpTransport;

const CORP_TOKEN_PATH: &str = "/cgi-bin/gettoken";
const SUITE_TOKEN_PATH: &str = "/cgi-bin/service/get_suite_token";
const AUTHORIZED_CORP_TOKEN_PATH: &str = "/cgi-bin/service/get_corp_token";

/// Token endpoint response. Corp endpoints name the token `access_token`,
/// the suite endpoint `suite_access_token`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(flatten)]
    status: ApplicationStatus,
    #[serde(default, alias = "suite_access_token")]
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

fn decode_token(response: &ApiResponse) -> Result<FetchedToken, QywxError> {
    let token: TokenResponse = response.json()?;
    token.status.into_result()?;
    if token.access_token.is_empty() {
        return Err(QywxError::Decode {
            message: "token response carried no token".into(),
            source: None,
        });
    }
    Ok(FetchedToken {
        value: token.access_token,
        expires_in: Duration::from_secs(token.expires_in),
    })
}

/// Mints corp tokens from the corp id and app secret.
pub struct CorpTokenFetcher {
    transport: HttpTransport,
    corp_id: String,
    corp_secret: String,
}

impl CorpTokenFetcher {
    pub fn new(
        transport: HttpTransport,
        corp_id: impl Into<String>,
        corp_secret: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            corp_id: corp_id.into(),
            corp_secret: corp_secret.into(),
        }
    }
}

impl fmt::Debug for CorpTokenFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorpTokenFetcher")
            .field("corp_id", &self.corp_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialFetcher for CorpTokenFetcher {
    fn principal(&self) -> PrincipalKind {
        PrincipalKind::Corp
    }

    async fn fetch(&self) -> Result<FetchedToken, QywxError> {
        debug!(corp_id = %self.corp_id, "fetching corp token");
        let request = ApiRequest::get(CORP_TOKEN_PATH)
            .query("corpid", &self.corp_id)
            .query("corpsecret", &self.corp_secret);
        let response = self.transport.send(&request, None).await?;
        decode_token(&response)
    }
}

#[derive(Serialize)]
struct SuiteTokenBody<'a> {
    suite_id: &'a str,
    suite_secret: &'a str,
    suite_ticket: &'a str,
}

/// Mints suite tokens from the suite secret and the latest pushed ticket.
pub struct SuiteTokenFetcher {
    transport: HttpTransport,
    suite_id: String,
    suite_secret: String,
    ticket: SuiteTicket,
}

impl SuiteTokenFetcher {
    /// `ticket` is shared with whoever receives ticket pushes.
    pub fn new(
        transport: HttpTransport,
        suite_id: impl Into<String>,
        suite_secret: impl Into<String>,
        ticket: SuiteTicket,
    ) -> Self {
        Self {
            transport,
            suite_id: suite_id.into(),
            suite_secret: suite_secret.into(),
            ticket,
        }
    }
}

impl fmt::Debug for SuiteTokenFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteTokenFetcher")
            .field("suite_id", &self.suite_id)
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialFetcher for SuiteTokenFetcher {
    fn principal(&self) -> PrincipalKind {
        PrincipalKind::Suite
    }

    async fn fetch(&self) -> Result<FetchedToken, QywxError> {
        let ticket = self.ticket.get().ok_or_else(|| {
            QywxError::Config(format!(
                "no suite ticket received yet for suite `{}`",
                self.suite_id
            ))
        })?;

        debug!(suite_id = %self.suite_id, "fetching suite token");
        let request = ApiRequest::post_json(
            SUITE_TOKEN_PATH,
            &SuiteTokenBody {
                suite_id: &self.suite_id,
                suite_secret: &self.suite_secret,
                suite_ticket: &ticket,
            },
        )?;
        let response = self.transport.send(&request, None).await?;
        decode_token(&response)
    }
}

#[derive(Serialize)]
struct AuthorizedCorpTokenBody<'a> {
    suite_id: &'a str,
    auth_corpid: &'a str,
    permanent_code: &'a str,
}

/// Mints tokens for a corp that authorized a suite.
///
/// The call is authenticated with the suite's own token, so it goes through
/// the suite's executor and inherits its refresh-and-replay.
pub struct AuthorizedCorpTokenFetcher {
    suite: Arc<RetryingExecutor>,
    suite_id: String,
    auth_corp_id: String,
    permanent_code: String,
}

impl AuthorizedCorpTokenFetcher {
    pub fn new(
        suite: Arc<RetryingExecutor>,
        suite_id: impl Into<String>,
        auth_corp_id: impl Into<String>,
        permanent_code: impl Into<String>,
    ) -> Self {
        Self {
            suite,
            suite_id: suite_id.into(),
            auth_corp_id: auth_corp_id.into(),
            permanent_code: permanent_code.into(),
        }
    }
}

impl fmt::Debug for AuthorizedCorpTokenFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedCorpTokenFetcher")
            .field("suite_id", &self.suite_id)
            .field("auth_corp_id", &self.auth_corp_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialFetcher for AuthorizedCorpTokenFetcher {
    fn principal(&self) -> PrincipalKind {
        PrincipalKind::AuthorizedCorp
    }

    async fn fetch(&self) -> Result<FetchedToken, QywxError> {
        debug!(auth_corp_id = %self.auth_corp_id, "fetching authorized corp token");
        let request = ApiRequest::post_json(
            AUTHORIZED_CORP_TOKEN_PATH,
            &AuthorizedCorpTokenBody {
                suite_id: &self.suite_id,
                auth_corpid: &self.auth_corp_id,
                permanent_code: &self.permanent_code,
            },
        )?;
        let response = self.suite.execute(&request).await?;
        decode_token(&response)
    }
}
