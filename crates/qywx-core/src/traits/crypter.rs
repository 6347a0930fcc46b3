// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Symmetric encryption capability used by the callback envelope.

use crate::error::QywxError;

/// Plaintext recovered from a callback ciphertext, with the owner id the
/// platform embedded at encryption time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decrypted {
    pub plaintext: Vec<u8>,
    pub owner_id: String,
}

/// Encrypts outbound and decrypts inbound callback payloads.
///
/// The primitive itself (key derivation, padding, cipher mode) is supplied
/// by the integrator; the envelope only needs these two operations.
pub trait MessageCrypter: Send + Sync {
    /// Encrypts `plaintext` for this instance's principal, returning the
    /// wire ciphertext (base64 text).
    fn encrypt(&self, plaintext: &[u8]) -> Result<String, QywxError>;

    /// Decrypts a wire ciphertext.
    fn decrypt(&self, ciphertext: &str) -> Result<Decrypted, QywxError>;
}
