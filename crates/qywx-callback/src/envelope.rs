// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback envelope state machine.
//!
//! Inbound: received → signature verified → decrypted → owner verified →
//! discriminated → parsed. Every step is terminal on failure and nothing
//! partially parsed is returned.

use std::fmt;
use std::sync::Arc;

use qywx_core::recording;
use qywx_core::{Clock, MessageCrypter, QywxError, SystemClock};
use rand::Rng;
use tracing::{debug, warn};

use crate::event::{self, CallbackEvent};
use crate::reply::ReplyMessage;
use crate::signature;
use crate::wire::{InboundEnvelope, OutboundEnvelope};

/// Which payload shape a callback endpoint receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Corp messages and events, discriminated by `MsgType` and `Event`.
    Corp,
    /// Suite notices, discriminated by `InfoType`.
    Suite,
}

/// Verifies, decrypts and decodes callbacks for one principal, and wraps
/// passive replies.
///
/// Holds only static configuration, so one instance can serve any number of
/// concurrent requests.
pub struct CallbackEnvelope {
    dialect: Dialect,
    principal_id: String,
    token: String,
    crypter: Arc<dyn MessageCrypter>,
    clock: Arc<dyn Clock>,
    passive_reply: bool,
}

impl CallbackEnvelope {
    /// Creates an envelope for a corp endpoint. Passive replies are enabled.
    pub fn for_corp(
        corp_id: impl Into<String>,
        token: impl Into<String>,
        crypter: Arc<dyn MessageCrypter>,
    ) -> Self {
        Self::new(Dialect::Corp, corp_id.into(), token.into(), crypter, true)
    }

    /// Creates an envelope for a suite endpoint. Suites have no passive
    /// reply, so [`respond`](Self::respond) returns empty output.
    pub fn for_suite(
        suite_id: impl Into<String>,
        token: impl Into<String>,
        crypter: Arc<dyn MessageCrypter>,
    ) -> Self {
        Self::new(Dialect::Suite, suite_id.into(), token.into(), crypter, false)
    }

    fn new(
        dialect: Dialect,
        principal_id: String,
        token: String,
        crypter: Arc<dyn MessageCrypter>,
        passive_reply: bool,
    ) -> Self {
        Self {
            dialect,
            principal_id,
            token,
            crypter,
            clock: Arc::new(SystemClock),
            passive_reply,
        }
    }

    /// Overrides whether [`respond`](Self::respond) produces output.
    pub fn with_passive_reply(mut self, enabled: bool) -> Self {
        self.passive_reply = enabled;
        self
    }

    /// Reads reply timestamps from `clock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The owner id decrypted payloads must carry.
    pub fn principal_id(&self) -> &str {
        &self.principal_id
    }

    /// Verifies and decodes an inbound callback body.
    pub fn parse(
        &self,
        body: &[u8],
        signature: &str,
        timestamp: &str,
        nonce: &str,
    ) -> Result<CallbackEvent, QywxError> {
        let envelope = InboundEnvelope::from_xml(body).inspect_err(|_| reject("malformed"))?;
        let plaintext = self.open(signature, timestamp, nonce, &envelope.encrypt)?;

        let decoded = match self.dialect {
            Dialect::Corp => event::decode_corp(&plaintext),
            Dialect::Suite => event::decode_suite(&plaintext),
        };
        match decoded {
            Ok(event) => {
                debug!(
                    principal_id = %self.principal_id,
                    kind = event.kind(),
                    "callback parsed"
                );
                Ok(event)
            }
            Err(e) => {
                let reason = match e {
                    QywxError::UnknownMessageType { .. } => "unknown_type",
                    _ => "malformed",
                };
                warn!(principal_id = %self.principal_id, error = %e, "callback payload rejected");
                reject(reason);
                Err(e)
            }
        }
    }

    /// Answers the platform's callback-URL handshake by verifying and
    /// decrypting `echostr` and returning the plaintext echo.
    pub fn verify_url(
        &self,
        signature: &str,
        timestamp: &str,
        nonce: &str,
        echostr: &str,
    ) -> Result<String, QywxError> {
        let plaintext = self.open(signature, timestamp, nonce, echostr)?;
        String::from_utf8(plaintext).map_err(|e| {
            reject("malformed");
            QywxError::decode("echo is not valid UTF-8", e)
        })
    }

    /// Encrypts, signs and wraps a plaintext reply.
    ///
    /// Returns empty output when passive replies are disabled.
    pub fn respond(&self, plaintext: &[u8]) -> Result<Vec<u8>, QywxError> {
        if !self.passive_reply {
            debug!(principal_id = %self.principal_id, "passive reply disabled, responding empty");
            return Ok(Vec::new());
        }

        let encrypt = self.crypter.encrypt(plaintext)?;
        let nonce = generate_nonce();
        let timestamp = self.clock.now().timestamp();
        let msg_signature = signature::sign(&self.token, &timestamp.to_string(), &nonce, &encrypt);

        OutboundEnvelope {
            encrypt,
            msg_signature,
            timestamp,
            nonce,
        }
        .to_xml()
    }

    /// Renders `reply` and passes it to [`respond`](Self::respond).
    pub fn respond_with(&self, reply: &ReplyMessage) -> Result<Vec<u8>, QywxError> {
        self.respond(&reply.to_xml()?)
    }

    fn open(
        &self,
        signature: &str,
        timestamp: &str,
        nonce: &str,
        ciphertext: &str,
    ) -> Result<Vec<u8>, QywxError> {
        if !signature::verify(signature, &self.token, timestamp, nonce, ciphertext) {
            warn!(principal_id = %self.principal_id, "callback signature mismatch");
            reject("signature");
            return Err(QywxError::SignatureMismatch);
        }

        let decrypted = self.crypter.decrypt(ciphertext).inspect_err(|e| {
            warn!(principal_id = %self.principal_id, error = %e, "callback decryption failed");
            reject("decryption");
        })?;

        if decrypted.owner_id != self.principal_id {
            warn!(
                expected = %self.principal_id,
                actual = %decrypted.owner_id,
                "callback addressed to another tenant"
            );
            reject("tenant");
            return Err(QywxError::TenantMismatch {
                expected: self.principal_id.clone(),
                actual: decrypted.owner_id,
            });
        }

        Ok(decrypted.plaintext)
    }
}

impl fmt::Debug for CallbackEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackEnvelope")
            .field("dialect", &self.dialect)
            .field("principal_id", &self.principal_id)
            .field("passive_reply", &self.passive_reply)
            .finish_non_exhaustive()
    }
}

fn reject(reason: &'static str) {
    recording::record_callback_rejected(reason);
}

/// A random 10-digit decimal nonce.
fn generate_nonce() -> String {
    rand::thread_rng()
        .gen_range(1_000_000_000u64..10_000_000_000u64)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_is_ten_digits() {
        for _ in 0..32 {
            let nonce = generate_nonce();
            assert_eq!(nonce.len(), 10);
            assert!(nonce.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
