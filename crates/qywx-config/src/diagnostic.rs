// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment extraction errors become [`ConfigError`]s rendered by miette.
//! Unknown keys carry the valid keys of their table and a Jaro-Winkler
//! suggestion; keys found in a loaded file carry a labelled span.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::path::Path;

use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity a valid key needs before it is offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A TOML document that fed the configuration, kept for span lookup.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Reads `path`, or `None` if it does not exist or is unreadable.
    pub fn read(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let name = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        Some(Self::new(name.display().to_string(), content))
    }

    fn is(&self, path: &Path) -> bool {
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        Path::new(&self.name) == path
    }

    fn named(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.content.clone())
    }
}

/// A configuration problem found while loading or validating.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in {}", table_label(.table))]
    #[diagnostic(
        code(qywx::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// Dotted table path, `None` at the top level.
        table: Option<String>,
        key: String,
        suggestion: Option<String>,
        valid_keys: Vec<&'static str>,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(qywx::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted key path.
        key: String,
        found: String,
        expected: String,
        #[label("wrong type")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(qywx::config::missing_key),
        help("set `{key}` in qywx.toml or through its QYWX_ variable")
    )]
    MissingKey { key: String },

    /// A value that parsed but breaks a cross-field rule.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(qywx::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(qywx::config::other))]
    Other(String),
}

fn table_label(table: &Option<String>) -> String {
    match table {
        Some(table) => format!("[{table}]"),
        None => "the top level".to_string(),
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &[&str]) -> String {
    let valid = valid_keys.join(", ");
    match suggestion {
        Some(s) => format!("did you mean `{s}`? valid keys: {valid}"),
        None => format!("valid keys: {valid}"),
    }
}

impl ConfigError {
    /// Converts one figment error, locating its key in `sources` when possible.
    pub fn from_figment(error: figment::error::Error, sources: &[SourceFile]) -> Self {
        use figment::error::Kind;

        let message = error.to_string();
        let source = source_of(&error, sources);
        let path = error.path;

        match error.kind {
            Kind::UnknownField(key, expected) => {
                let table = parent_of(&path, &key);
                let (span, src) = locate(source, table, &key);
                ConfigError::UnknownKey {
                    table: (!table.is_empty()).then(|| table.join(".")),
                    suggestion: suggest_key(&key, expected),
                    valid_keys: expected.to_vec(),
                    key,
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => {
                let key = parent_of(&path, &field)
                    .iter()
                    .map(String::as_str)
                    .chain([field.as_ref()])
                    .collect::<Vec<_>>()
                    .join(".");
                ConfigError::MissingKey { key }
            }
            Kind::InvalidType(found, expected) => {
                let (span, src) = match path.split_last() {
                    Some((leaf, table)) => locate(source, table, leaf),
                    None => (None, None),
                };
                ConfigError::InvalidType {
                    key: path.join("."),
                    found: found.to_string(),
                    expected,
                    span,
                    src,
                }
            }
            _ => ConfigError::Other(message),
        }
    }
}

/// The table holding `key`. Figment paths may already end with the key.
fn parent_of<'a>(path: &'a [String], key: &str) -> &'a [String] {
    match path.split_last() {
        Some((last, parent)) if last == key => parent,
        _ => path,
    }
}

/// Converts every error carried by `err`.
pub fn from_figment(err: figment::Error, sources: &[SourceFile]) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| ConfigError::from_figment(error, sources))
        .collect()
}

/// The file an error came from. Errors without file metadata (inline
/// strings) fall back to the only source when there is exactly one.
fn source_of<'a>(error: &figment::error::Error, sources: &'a [SourceFile]) -> Option<&'a SourceFile> {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| s.file_path());
    match file {
        Some(path) => sources.iter().find(|s| s.is(path)),
        None if sources.len() == 1 => sources.first(),
        None => None,
    }
}

fn locate(
    source: Option<&SourceFile>,
    table: &[String],
    key: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    source
        .and_then(|file| {
            let offset = key_offset(&file.content, table, key)?;
            Some((SourceSpan::new(offset.into(), key.len()), file.named()))
        })
        .map_or((None, None), |(span, src)| (Some(span), Some(src)))
}

/// Byte offset of `key` inside the `table` of a TOML document. An empty
/// `table` means top-level keys, which includes table headers themselves.
pub fn key_offset(content: &str, table: &[String], key: &str) -> Option<usize> {
    let wanted = table.join(".");
    let mut current = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some(header) = trimmed.strip_prefix('[') {
            let name = header.split(']').next().unwrap_or("").trim();
            if wanted.is_empty() && name == key {
                return Some(offset + indent + 1);
            }
            current = name.to_string();
        } else if current == wanted
            && trimmed
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='))
        {
            return Some(offset + indent);
        }

        offset += line.len();
    }

    None
}

/// The candidate most similar to `unknown`, if any clears the threshold.
pub fn suggest_key(unknown: &str, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .map(|&candidate| (strsim::jaro_winkler(unknown, candidate), candidate))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_string())
}

/// Renders `errors` to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    let mut out = String::new();
    for error in errors {
        if handler.render_report(&mut out, error).is_err() {
            out.push_str(&format!("Error: {error}\n"));
        }
    }
    eprint!("{out}");
}
