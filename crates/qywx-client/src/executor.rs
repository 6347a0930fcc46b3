// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrying authenticated request executor.
//!
//! Provides [`RetryingExecutor`], which attaches the principal's token to a
//! request, decodes the application status from the response body, and on a
//! credential-failure code replaces the rejected token and replays the
//! request once with only the token rewritten.

use std::sync::Arc;
use std::time::{Duration, Instant};

use qywx_core::recording;
use qywx_core::{ApplicationStatus, QywxError};
use qywx_token::TokenCache;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::policy::AuthPolicy;
use crate::request::{ApiRequest, ApiResponse};
use crate::transport::HttpTransport;

/// Extra attempts allowed per logical call after a credential failure.
const MAX_REPLAYS: u32 = 1;

/// Executes API calls on behalf of one principal.
#[derive(Debug, Clone)]
pub struct RetryingExecutor {
    transport: HttpTransport,
    cache: Arc<TokenCache>,
    policy: AuthPolicy,
    call_timeout: Option<Duration>,
}

impl RetryingExecutor {
    /// Creates an executor sending through `transport` with tokens from `cache`.
    pub fn new(transport: HttpTransport, cache: Arc<TokenCache>, policy: AuthPolicy) -> Self {
        Self {
            transport,
            cache,
            policy,
            call_timeout: None,
        }
    }

    /// Bounds each logical call, original attempt and replay together.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// The principal and credential-failure codes this executor applies.
    pub fn policy(&self) -> AuthPolicy {
        self.policy
    }

    /// The token cache shared with every executor of the same principal.
    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// Executes `request` and returns the successful response.
    ///
    /// Media responses are returned without status decoding. Transport
    /// failures are never retried.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, QywxError> {
        let started = Instant::now();
        let result = match self.call_timeout {
            Some(duration) => tokio::time::timeout(duration, self.execute_attempts(request))
                .await
                .map_err(|_| QywxError::Timeout { duration })
                .and_then(|r| r),
            None => self.execute_attempts(request).await,
        };
        recording::record_latency(started.elapsed().as_secs_f64());
        result
    }

    /// Executes `request` and decodes the successful body as JSON.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, QywxError> {
        self.execute(request).await?.json()
    }

    async fn execute_attempts(&self, request: &ApiRequest) -> Result<ApiResponse, QywxError> {
        let principal = self.policy.principal;
        let mut rejected: Option<String> = None;

        for attempt in 0..=MAX_REPLAYS {
            let token = match &rejected {
                None => self.cache.get().await,
                Some(stale) => {
                    recording::record_replay(principal);
                    self.cache.refresh_rejected(stale).await
                }
            }
            .map_err(|e| QywxError::CredentialRefresh {
                principal,
                source: Box::new(e),
            })?;

            let response = self
                .transport
                .send(request, Some((self.policy.token_param, &token)))
                .await?;

            if response.is_media() {
                debug!(principal = %principal, attempt, "media response, skipping status decode");
                return Ok(response);
            }

            let status = ApplicationStatus::from_json(&response.body)?;
            if status.is_ok() {
                return Ok(response);
            }

            if attempt < MAX_REPLAYS && self.policy.is_credential_failure(status.code) {
                warn!(
                    principal = %principal,
                    code = status.code,
                    "credential rejected, refreshing token and replaying"
                );
                rejected = Some(token);
                continue;
            }

            debug!(principal = %principal, attempt, code = status.code, "application error");
            return Err(QywxError::Application {
                code: status.code,
                message: status.message,
            });
        }

        Err(QywxError::Internal(format!(
            "{principal} request exhausted {MAX_REPLAYS} replay"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qywx_core::PrincipalKind;
    use qywx_test_utils::CountingFetcher;
    use tracing_test::traced_test;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn executor(
        server: &MockServer,
        fetcher: &Arc<CountingFetcher>,
        policy: AuthPolicy,
    ) -> RetryingExecutor {
        let transport =
            HttpTransport::new(&server.uri(), Duration::from_secs(5), "qywx-test").unwrap();
        let cache = Arc::new(TokenCache::new(fetcher.clone()));
        RetryingExecutor::new(transport, cache, policy)
    }

    fn ok_body() -> serde_json::Value {
        serde_json::json!({"errcode": 0, "errmsg": "ok", "name": "Zhang San"})
    }

    fn status_body(code: i64) -> serde_json::Value {
        serde_json::json!({"errcode": code, "errmsg": "rejected"})
    }

    #[tokio::test]
    async fn success_needs_no_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/user/get"))
            .and(query_param("access_token", "corp-token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Corp));
        let exec = executor(&server, &fetcher, AuthPolicy::CORP);
        let body: serde_json::Value = exec
            .execute_json(&ApiRequest::get("/cgi-bin/user/get?userid=zhangsan"))
            .await
            .unwrap();

        assert_eq!(body["name"], "Zhang San");
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn credential_failure_refreshes_and_replays_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/user/get"))
            .and(query_param("access_token", "corp-token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body(42001)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/user/get"))
            .and(query_param("userid", "zhangsan"))
            .and(query_param("access_token", "corp-token-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Corp));
        let exec = executor(&server, &fetcher, AuthPolicy::CORP);
        let response = exec
            .execute(&ApiRequest::get("/cgi-bin/user/get?userid=zhangsan"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(exec.cache().snapshot().value(), "corp-token-2");
    }

    #[tokio::test]
    async fn replayed_post_body_is_identical() {
        let server = MockServer::start().await;
        let payload = serde_json::json!({"touser": "@all", "msgtype": "text", "agentid": 1});
        Mock::given(method("POST"))
            .and(path("/cgi-bin/message/send"))
            .and(query_param("access_token", "corp-token-1"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body(40001)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/cgi-bin/message/send"))
            .and(query_param("access_token", "corp-token-2"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Corp));
        let exec = executor(&server, &fetcher, AuthPolicy::CORP);
        let request = ApiRequest::post_json("/cgi-bin/message/send", &payload).unwrap();
        exec.execute(&request).await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_rejections_share_one_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/user/get"))
            .and(query_param("access_token", "corp-token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body(42001)))
            .expect(4)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/user/get"))
            .and(query_param("access_token", "corp-token-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(4)
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Corp));
        let exec = executor(&server, &fetcher, AuthPolicy::CORP);
        exec.cache().get().await.unwrap();

        let request = ApiRequest::get("/cgi-bin/user/get?userid=zhangsan");
        let (a, b, c, d) = tokio::join!(
            exec.execute(&request),
            exec.execute(&request),
            exec.execute(&request),
            exec.execute(&request),
        );
        for result in [a, b, c, d] {
            assert_eq!(result.unwrap().status, 200);
        }
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(exec.cache().snapshot().value(), "corp-token-2");
    }

    #[tokio::test]
    async fn second_credential_failure_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/department/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body(40001)))
            .expect(2)
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Corp));
        let exec = executor(&server, &fetcher, AuthPolicy::CORP);
        let err = exec
            .execute(&ApiRequest::get("/cgi-bin/department/list"))
            .await
            .unwrap_err();

        assert!(matches!(err, QywxError::Application { code: 40001, .. }), "got: {err}");
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn unknown_code_fails_without_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body(60011)))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Corp));
        let exec = executor(&server, &fetcher, AuthPolicy::CORP);
        let err = exec
            .execute(&ApiRequest::get("/cgi-bin/user/get"))
            .await
            .unwrap_err();

        assert_eq!(err.application_code(), Some(60011));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn codes_are_scoped_to_the_policy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("suite_access_token", "suite-token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body(40001)))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Suite));
        let exec = executor(&server, &fetcher, AuthPolicy::SUITE);
        let err = exec
            .execute(&ApiRequest::get("/cgi-bin/service/get_auth_info"))
            .await
            .unwrap_err();

        assert_eq!(err.application_code(), Some(40001));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Corp));
        let exec = executor(&server, &fetcher, AuthPolicy::CORP);
        let err = exec
            .execute(&ApiRequest::get("/cgi-bin/user/get"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, QywxError::Transport { status: Some(502), .. }),
            "got: {err}"
        );
        assert!(!err.to_string().contains("corp-token-1"));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn media_is_passed_through() {
        let server = MockServer::start().await;
        let jpeg = vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10];
        Mock::given(method("GET"))
            .and(path("/cgi-bin/media/get"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(jpeg.clone(), "image/jpeg"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Corp));
        let exec = executor(&server, &fetcher, AuthPolicy::CORP);
        let response = exec
            .execute(&ApiRequest::get("/cgi-bin/media/get?media_id=m1"))
            .await
            .unwrap();

        assert!(response.is_media());
        assert_eq!(response.body, jpeg);
        assert_eq!(response.content_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn call_timeout_covers_the_logical_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ok_body())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Corp));
        let exec = executor(&server, &fetcher, AuthPolicy::CORP)
            .with_call_timeout(Duration::from_millis(200));
        let err = exec
            .execute(&ApiRequest::get("/cgi-bin/user/get"))
            .await
            .unwrap_err();

        assert!(matches!(err, QywxError::Timeout { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn refresh_failure_on_replay_is_credential_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body(42001)))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Corp));
        let exec = executor(&server, &fetcher, AuthPolicy::CORP);
        exec.cache().get().await.unwrap();
        fetcher.fail_next(1);

        let err = exec
            .execute(&ApiRequest::get("/cgi-bin/user/get"))
            .await
            .unwrap_err();

        assert!(
            matches!(
                err,
                QywxError::CredentialRefresh {
                    principal: PrincipalKind::Corp,
                    ..
                }
            ),
            "got: {err}"
        );
        assert!(exec.cache().snapshot().value().is_empty());
    }

    #[tokio::test]
    async fn undecodable_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<html>", "text/plain"))
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Corp));
        let exec = executor(&server, &fetcher, AuthPolicy::CORP);
        let err = exec
            .execute(&ApiRequest::get("/cgi-bin/user/get"))
            .await
            .unwrap_err();

        assert!(matches!(err, QywxError::Decode { .. }), "got: {err}");
    }

    #[tokio::test]
    #[traced_test]
    async fn logs_never_carry_the_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("access_token", "corp-token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body(42001)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("access_token", "corp-token-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .mount(&server)
            .await;

        let fetcher = Arc::new(CountingFetcher::new(PrincipalKind::Corp));
        let exec = executor(&server, &fetcher, AuthPolicy::CORP);
        exec.execute(&ApiRequest::get("/cgi-bin/user/get"))
            .await
            .unwrap();

        assert!(logs_contain("credential rejected"));
        assert!(logs_contain("access_token=[REDACTED]"));
        assert!(!logs_contain("access_token=corp-token-1"));
        assert!(!logs_contain("access_token=corp-token-2"));
    }
}
