// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `qywx check` command implementation.

use qywx_config::QywxConfig;

/// Print which principals and callback keys the loaded configuration
/// provides. Validation already ran while loading.
pub fn run_check(config: &QywxConfig) {
    println!("qywx: config OK");
    for line in summary(config) {
        println!("  {line}");
    }
}

fn summary(config: &QywxConfig) -> Vec<String> {
    let configured = |id: &Option<String>, secret: &Option<String>| match (id, secret) {
        (Some(id), Some(_)) => format!("{id} (ready)"),
        (Some(id), None) => format!("{id} (no secret)"),
        _ => "not configured".to_string(),
    };

    let ticket = if config.suite.suite_ticket.is_some() {
        "seeded"
    } else {
        "awaiting push"
    };
    let callback = match (&config.callback.token, &config.callback.encoding_aes_key) {
        (Some(_), Some(_)) => "token and key set",
        (Some(_), None) => "token set, no key",
        _ => "not configured",
    };

    vec![
        format!(
            "corp:     {}",
            configured(&config.corp.corp_id, &config.corp.corp_secret)
        ),
        format!(
            "suite:    {}, ticket {ticket}",
            configured(&config.suite.suite_id, &config.suite.suite_secret)
        ),
        format!("callback: {callback}"),
        format!("api:      {}", config.api.base_url),
    ]
}
