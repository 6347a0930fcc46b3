// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `qywx token` and `qywx call` command implementations.

use std::io::Write;

use qywx::{ApiRequest, CorpApi, Method, QywxError, RetryingExecutor, SuiteApi};
use qywx_client::request::JSON_CONTENT_TYPE;
use qywx_config::QywxConfig;
use qywx_security::REDACTED;

use crate::{Principal, PrincipalArgs};

/// Handle that keeps whichever API object owns the executor alive.
enum Handle {
    Corp(CorpApi),
    Suite(SuiteApi),
    AuthorizedCorp(qywx::AuthorizedCorpApi),
}

impl Handle {
    fn executor(&self) -> &RetryingExecutor {
        match self {
            Self::Corp(api) => api.executor(),
            Self::Suite(api) => api.executor(),
            Self::AuthorizedCorp(api) => api.executor(),
        }
    }
}

fn open(config: &QywxConfig, args: &PrincipalArgs) -> Result<Handle, QywxError> {
    match args.principal {
        Principal::Corp => Ok(Handle::Corp(CorpApi::from_config(config)?)),
        Principal::Suite => Ok(Handle::Suite(SuiteApi::from_config(config)?)),
        Principal::AuthorizedCorp => {
            let (Some(auth_corp_id), Some(permanent_code)) =
                (&args.auth_corp_id, &args.permanent_code)
            else {
                return Err(QywxError::Config(
                    "--principal authorized-corp needs --auth-corp-id and --permanent-code"
                        .into(),
                ));
            };
            let suite = SuiteApi::from_config(config)?;
            Ok(Handle::AuthorizedCorp(
                suite.authorized_corp(auth_corp_id.clone(), permanent_code.clone()),
            ))
        }
    }
}

/// Run the `qywx token` command.
pub async fn run_token(
    config: &QywxConfig,
    args: &PrincipalArgs,
    show: bool,
) -> Result<(), QywxError> {
    let handle = open(config, args)?;
    let cache = handle.executor().cache();
    let token = cache.refresh().await?;
    let state = cache.snapshot();

    println!("principal:  {}", cache.principal());
    println!("expires_at: {}", state.expires_at());
    println!("token:      {}", if show { token.as_str() } else { REDACTED });
    Ok(())
}

/// Run the `qywx call` command. JSON responses are printed as text, media
/// bodies are written to stdout unchanged.
pub async fn run_call(
    config: &QywxConfig,
    args: &PrincipalArgs,
    method: &str,
    path: &str,
    query: &[String],
    json: Option<String>,
) -> Result<(), QywxError> {
    let request = build_request(method, path, query, json)?;
    let handle = open(config, args)?;
    let response = handle.executor().execute(&request).await?;

    let mut stdout = std::io::stdout().lock();
    let written = if response.is_media() {
        stdout.write_all(&response.body)
    } else {
        writeln!(stdout, "{}", response.text())
    };
    written.map_err(|e| QywxError::Internal(format!("failed to write response: {e}")))
}

fn build_request(
    method: &str,
    path: &str,
    query: &[String],
    json: Option<String>,
) -> Result<ApiRequest, QywxError> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| QywxError::Config(format!("invalid HTTP method `{method}`")))?;

    let mut request = ApiRequest::new(method, path);
    for pair in query {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| QywxError::Config(format!("query `{pair}` is not key=value")))?;
        request = request.query(key, value);
    }

    if let Some(body) = json {
        serde_json::from_str::<serde_json::Value>(&body)
            .map_err(|e| QywxError::decode("request body is not valid JSON", e))?;
        request = request.with_body(JSON_CONTENT_TYPE, body.into_bytes());
    }

    Ok(request)
}
