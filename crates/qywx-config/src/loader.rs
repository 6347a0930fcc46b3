// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading.
//!
//! Compiled defaults are overlaid by every file in [`search_paths`] that
//! exists, in order, and then by `QYWX_<SECTION>_<KEY>` environment
//! variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use crate::model::QywxConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/qywx/qywx.toml";

/// Local config file, resolved from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "qywx.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "QYWX_";

/// Top-level tables, used to split environment variable names.
const SECTIONS: &[&str] = &["corp", "suite", "callback", "api", "token", "log"];

/// Config files in merge order: system, per-user, local.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("qywx").join(LOCAL_CONFIG_FILE));
    }
    paths.push(PathBuf::from(LOCAL_CONFIG_FILE));
    paths
}

/// Loads defaults, every file in [`search_paths`], then the environment.
pub fn load_config() -> Result<QywxConfig, figment::Error> {
    layered(&search_paths()).extract()
}

/// Loads defaults, the file at `path`, then the environment.
pub fn load_config_from_path(path: &Path) -> Result<QywxConfig, figment::Error> {
    layered(&[path.to_path_buf()]).extract()
}

/// Loads defaults and a TOML string. Files and environment are ignored.
pub fn load_config_from_str(toml_content: &str) -> Result<QywxConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

fn defaults() -> Figment {
    Figment::from(Serialized::defaults(QywxConfig::default()))
}

fn layered(files: &[PathBuf]) -> Figment {
    files
        .iter()
        .fold(defaults(), |figment, file| figment.merge(Toml::file(file)))
        .merge(Env::prefixed(ENV_PREFIX).map(|key| env_key(key.as_str()).into()))
}

/// Maps a prefix-stripped variable name to its dotted key. Keys contain
/// underscores, so only the leading section name is split off:
/// `corp_corp_secret` becomes `corp.corp_secret`.
fn env_key(raw: &str) -> String {
    let raw = raw.to_ascii_lowercase();
    SECTIONS
        .iter()
        .find_map(|section| {
            raw.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| format!("{section}.{rest}"))
        })
        .unwrap_or(raw)
}
