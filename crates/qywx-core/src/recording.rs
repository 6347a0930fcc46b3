// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder (Prometheus, statsd, etc.)
//! installed by the host application can collect these.

use metrics::{describe_counter, describe_histogram};

use crate::types::PrincipalKind;

/// Register all qywx metric descriptions.
///
/// Call once after the host installs a recorder.
pub fn register_metrics() {
    describe_counter!(
        "qywx_token_refresh_total",
        "Token fetches performed, by principal and outcome"
    );
    describe_counter!(
        "qywx_request_replay_total",
        "Requests replayed after a credential-failure status"
    );
    describe_counter!(
        "qywx_callback_rejected_total",
        "Inbound callbacks rejected, by reason"
    );
    describe_histogram!(
        "qywx_request_latency_seconds",
        "Latency of one logical API call including any replay"
    );
}

/// Record a token fetch.
pub fn record_refresh(principal: PrincipalKind, ok: bool) {
    let outcome = if ok { "success" } else { "failure" };
    metrics::counter!(
        "qywx_token_refresh_total",
        "principal" => principal.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a replay triggered by a credential-failure code.
pub fn record_replay(principal: PrincipalKind) {
    metrics::counter!("qywx_request_replay_total", "principal" => principal.to_string())
        .increment(1);
}

/// Record a rejected inbound callback.
pub fn record_callback_rejected(reason: &'static str) {
    metrics::counter!("qywx_callback_rejected_total", "reason" => reason).increment(1);
}

/// Record logical call latency.
pub fn record_latency(seconds: f64) {
    metrics::histogram!("qywx_request_latency_seconds").record(seconds);
}
