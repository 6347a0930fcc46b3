// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the qywx configuration system.

use qywx_config::diagnostic::ConfigError;
use qywx_config::model::QywxConfig;
use qywx_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use serial_test::serial;

#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[corp]
corp_id = "wx5823bf96d3bd56c7"
corp_secret = "corp-secret"
agent_id = 1000002

[suite]
suite_id = "tj1234"
suite_secret = "suite-secret"
suite_ticket = "ticket"

[callback]
token = "QDG6eK"
encoding_aes_key = "jWmYm7qr5nMoAUwZRjGtBxmz3KA1tkAj3ykkR6q2B2C"

[api]
base_url = "http://127.0.0.1:9000"
attempt_timeout_secs = 5
call_timeout_secs = 12

[token]
expiry_margin_secs = 60

[log]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.corp.corp_id.as_deref(), Some("wx5823bf96d3bd56c7"));
    assert_eq!(config.corp.agent_id, Some(1000002));
    assert_eq!(config.suite.suite_ticket.as_deref(), Some("ticket"));
    assert_eq!(config.callback.token.as_deref(), Some("QDG6eK"));
    assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
    assert_eq!(config.api.attempt_timeout_secs, 5);
    assert_eq!(config.api.call_timeout_secs, 12);
    assert_eq!(config.token.expiry_margin_secs, 60);
    assert_eq!(config.log.level, "debug");
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert!(config.corp.corp_id.is_none());
    assert!(config.suite.suite_id.is_none());
    assert!(config.callback.token.is_none());
    assert_eq!(config.api.base_url, "https://qyapi.weixin.qq.com");
    assert_eq!(config.token.expiry_margin_secs, 0);
    assert_eq!(config.log.level, "info");
}

#[test]
fn unknown_field_in_corp_produces_error() {
    let toml = r#"
[corp]
corp_secert = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("corp_secert"),
        "error should mention unknown field, got: {err_str}"
    );
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let toml = r#"
[logging]
level = "debug"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown table");
    assert!(
        errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownKey { table: None, key, suggestion, .. }
                if key == "logging" && suggestion.as_deref() == Some("log")
        )),
        "got: {errors:?}"
    );
}

#[test]
fn diagnostic_suggests_correct_key() {
    let toml = r#"
[corp]
corp_secert = "abc"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_suggestion = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "corp_secert"
                && suggestion.as_deref() == Some("corp_secret")
                && valid_keys.contains(&"corp_id")
        })
    });
    assert!(has_suggestion, "got: {errors:?}");
}

#[test]
fn invalid_type_is_reported() {
    let toml = r#"
[api]
attempt_timeout_secs = "soon"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("attempt_timeout_secs"))),
        "got: {errors:?}"
    );
}

#[test]
fn validation_runs_after_deserialization() {
    let toml = r#"
[callback]
token = "t"
encoding_aes_key = "short"
"#;

    let errors = load_and_validate_str(toml).expect_err("short key should fail validation");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("encoding_aes_key"))
    ));
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        table: Some("corp".to_string()),
        key: "corp_secert".to_string(),
        suggestion: Some("corp_secret".to_string()),
        valid_keys: vec!["corp_id", "corp_secret", "agent_id"],
        span: None,
        src: None,
    };

    let help = error.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("did you mean `corp_secret`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("corp_secert"));
}

#[test]
#[serial]
fn env_vars_override_toml() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "qywx.toml",
            r#"
[corp]
corp_id = "from-toml"
"#,
        )?;
        jail.set_env("QYWX_CORP_CORP_SECRET", "from-env");
        jail.set_env("QYWX_API_CALL_TIMEOUT_SECS", "45");

        let config: QywxConfig =
            qywx_config::load_config_from_path(std::path::Path::new("qywx.toml"))?;
        assert_eq!(config.corp.corp_id.as_deref(), Some("from-toml"));
        assert_eq!(config.corp.corp_secret.as_deref(), Some("from-env"));
        assert_eq!(config.api.call_timeout_secs, 45);
        Ok(())
    });
}

#[test]
#[serial]
fn file_errors_point_at_the_offending_key() {
    use miette::Diagnostic;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qywx.toml");
    std::fs::write(&path, "[suite]\nsuite_id = \"tj1\"\nsuite_tiket = \"t\"\n").unwrap();

    let errors = load_and_validate_path(&path).expect_err("typo should be rejected");
    let error = errors
        .iter()
        .find(|e| matches!(e, ConfigError::UnknownKey { .. }))
        .expect("unknown key error");
    let label = error.labels().and_then(|mut l| l.next()).expect("labelled span");
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        &content[label.offset()..label.offset() + label.len()],
        "suite_tiket"
    );
}

#[test]
#[serial]
fn file_config_loads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qywx.toml");
    std::fs::write(&path, "[corp]\ncorp_id = \"wx1\"\ncorp_secret = \"s\"\n").unwrap();

    let config = load_and_validate_path(&path).unwrap();
    assert_eq!(config.corp.corp_id.as_deref(), Some("wx1"));
}
