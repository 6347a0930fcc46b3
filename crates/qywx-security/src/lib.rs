// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for the qywx client.
//!
//! Tokens travel in query strings and secrets in JSON bodies, so anything
//! that logs a URL or a request body goes through [`redact`] or
//! [`redact_url`] first.

pub mod redact;

pub use redact::{REDACTED, RedactingWriter, redact, redact_url};
