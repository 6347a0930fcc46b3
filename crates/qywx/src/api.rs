// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-principal API handles.

use std::sync::Arc;

use qywx_callback::{CallbackEnvelope, CallbackEvent};
use qywx_client::{
    ApiRequest, ApiResponse, AuthorizedCorpTokenFetcher, CorpTokenFetcher, HttpTransport,
    RetryingExecutor, SuiteTokenFetcher,
};
use qywx_config::QywxConfig;
use qywx_core::{MessageCrypter, QywxError};
use qywx_token::SuiteTicket;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::wiring;

/// API access for a corp using its own app secret.
#[derive(Debug, Clone)]
pub struct CorpApi {
    corp_id: String,
    executor: Arc<RetryingExecutor>,
}

impl CorpApi {
    /// Builds the handle from `[corp]` and `[api]`.
    pub fn from_config(config: &QywxConfig) -> Result<Self, QywxError> {
        let corp_id = wiring::required(&config.corp.corp_id, "corp.corp_id")?;
        let corp_secret = wiring::required(&config.corp.corp_secret, "corp.corp_secret")?;
        let transport = wiring::transport(config)?;
        let fetcher = CorpTokenFetcher::new(transport.clone(), corp_id, corp_secret);
        Ok(Self {
            corp_id: corp_id.to_string(),
            executor: Arc::new(wiring::executor(config, transport, Arc::new(fetcher))),
        })
    }

    pub fn corp_id(&self) -> &str {
        &self.corp_id
    }

    pub fn executor(&self) -> &RetryingExecutor {
        &self.executor
    }

    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, QywxError> {
        self.executor.execute(request).await
    }

    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, QywxError> {
        self.executor.execute_json(request).await
    }

    /// Builds the callback envelope for this corp's endpoint from
    /// `[callback]`. The owner id defaults to the corp id.
    pub fn callback_envelope(
        &self,
        config: &QywxConfig,
        crypter: Arc<dyn MessageCrypter>,
    ) -> Result<CallbackEnvelope, QywxError> {
        let token = wiring::required(&config.callback.token, "callback.token")?;
        let owner = config
            .callback
            .receiver_id
            .as_deref()
            .unwrap_or(&self.corp_id);
        Ok(CallbackEnvelope::for_corp(owner, token, crypter))
    }
}

/// API access for a third-party suite.
///
/// The suite ticket is shared between the token fetcher and
/// [`handle_callback`](Self::handle_callback), so a pushed ticket is used by
/// the next suite token refresh.
#[derive(Debug, Clone)]
pub struct SuiteApi {
    suite_id: String,
    ticket: SuiteTicket,
    executor: Arc<RetryingExecutor>,
    transport: HttpTransport,
    config: Arc<QywxConfig>,
}

impl SuiteApi {
    /// Builds the handle from `[suite]` and `[api]`. A missing ticket is not
    /// an error here; token fetches fail until one is pushed.
    pub fn from_config(config: &QywxConfig) -> Result<Self, QywxError> {
        let suite_id = wiring::required(&config.suite.suite_id, "suite.suite_id")?;
        let suite_secret = wiring::required(&config.suite.suite_secret, "suite.suite_secret")?;
        let ticket = SuiteTicket::new(config.suite.suite_ticket.clone());
        let transport = wiring::transport(config)?;
        let fetcher =
            SuiteTokenFetcher::new(transport.clone(), suite_id, suite_secret, ticket.clone());
        Ok(Self {
            suite_id: suite_id.to_string(),
            ticket,
            executor: Arc::new(wiring::executor(config, transport.clone(), Arc::new(fetcher))),
            transport,
            config: Arc::new(config.clone()),
        })
    }

    pub fn suite_id(&self) -> &str {
        &self.suite_id
    }

    pub fn ticket(&self) -> &SuiteTicket {
        &self.ticket
    }

    pub fn executor(&self) -> &RetryingExecutor {
        &self.executor
    }

    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, QywxError> {
        self.executor.execute(request).await
    }

    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, QywxError> {
        self.executor.execute_json(request).await
    }

    /// Builds the callback envelope for the suite's notice endpoint. The
    /// owner id defaults to the suite id.
    pub fn callback_envelope(
        &self,
        crypter: Arc<dyn MessageCrypter>,
    ) -> Result<CallbackEnvelope, QywxError> {
        let token = wiring::required(&self.config.callback.token, "callback.token")?;
        let owner = self
            .config
            .callback
            .receiver_id
            .as_deref()
            .unwrap_or(&self.suite_id);
        Ok(CallbackEnvelope::for_suite(owner, token, crypter))
    }

    /// Parses a suite notice and stores a pushed ticket.
    pub fn handle_callback(
        &self,
        envelope: &CallbackEnvelope,
        body: &[u8],
        signature: &str,
        timestamp: &str,
        nonce: &str,
    ) -> Result<CallbackEvent, QywxError> {
        let event = envelope.parse(body, signature, timestamp, nonce)?;
        if let CallbackEvent::SuiteTicket(pushed) = &event {
            self.ticket.set(pushed.suite_ticket.clone());
            info!(suite_id = %pushed.suite_id, "suite ticket updated");
        }
        Ok(event)
    }

    /// API access on behalf of a corp that authorized this suite.
    pub fn authorized_corp(
        &self,
        auth_corp_id: impl Into<String>,
        permanent_code: impl Into<String>,
    ) -> AuthorizedCorpApi {
        let auth_corp_id = auth_corp_id.into();
        let fetcher = AuthorizedCorpTokenFetcher::new(
            Arc::clone(&self.executor),
            self.suite_id.clone(),
            auth_corp_id.clone(),
            permanent_code,
        );
        AuthorizedCorpApi {
            auth_corp_id,
            executor: Arc::new(wiring::executor(
                &self.config,
                self.transport.clone(),
                Arc::new(fetcher),
            )),
        }
    }
}

/// API access for a corp that authorized a suite, authenticated with a
/// token minted through the suite.
#[derive(Debug, Clone)]
pub struct AuthorizedCorpApi {
    auth_corp_id: String,
    executor: Arc<RetryingExecutor>,
}

impl AuthorizedCorpApi {
    pub fn auth_corp_id(&self) -> &str {
        &self.auth_corp_id
    }

    pub fn executor(&self) -> &RetryingExecutor {
        &self.executor
    }

    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, QywxError> {
        self.executor.execute(request).await
    }

    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, QywxError> {
        self.executor.execute_json(request).await
    }
}
