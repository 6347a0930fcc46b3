// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the qywx client.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use qywx_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("API base: {}", config.api.base_url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, SourceFile, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::QywxConfig;

/// Loads configuration from the standard search paths and validates it.
pub fn load_and_validate() -> Result<QywxConfig, Vec<ConfigError>> {
    checked(loader::load_config(), || {
        loader::search_paths()
            .iter()
            .filter_map(|path| SourceFile::read(path))
            .collect()
    })
}

/// Loads configuration from `path` (plus environment) and validates it.
pub fn load_and_validate_path(path: &Path) -> Result<QywxConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        SourceFile::read(path).into_iter().collect()
    })
}

/// Loads configuration from a TOML string and validates it.
pub fn load_and_validate_str(toml_content: &str) -> Result<QywxConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![SourceFile::new("<inline>", toml_content)]
    })
}

/// Turns an extraction failure into diagnostics, reading `sources` only on
/// that path, and runs validation on success.
fn checked(
    loaded: Result<QywxConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<SourceFile>,
) -> Result<QywxConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::from_figment(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}
