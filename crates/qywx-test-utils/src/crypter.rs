// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reversible stand-in for the platform's message cipher.
//!
//! Frames plaintext the way the platform does (16 pad bytes, big-endian
//! length, message, owner id) and base64-encodes the frame, without any
//! encryption. Good enough to drive the envelope state machine.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use qywx_core::{Decrypted, MessageCrypter, QywxError};

const PAD: [u8; 16] = *b"0123456789abcdef";
const HEADER_LEN: usize = PAD.len() + 4;

/// A crypter that embeds `owner_id` into every frame it encrypts.
#[derive(Debug, Clone)]
pub struct MockCrypter {
    owner_id: String,
}

impl MockCrypter {
    /// Creates a crypter for the given owner (corp id or suite id).
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }

    /// Owner id embedded on encryption.
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

fn decryption(message: impl Into<String>) -> QywxError {
    QywxError::Decryption {
        message: message.into(),
        source: None,
    }
}

impl MessageCrypter for MockCrypter {
    fn encrypt(&self, plaintext: &[u8]) -> Result<String, QywxError> {
        let len = u32::try_from(plaintext.len()).map_err(|_| decryption("plaintext too long"))?;
        let mut frame = Vec::with_capacity(HEADER_LEN + plaintext.len() + self.owner_id.len());
        frame.extend_from_slice(&PAD);
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(plaintext);
        frame.extend_from_slice(self.owner_id.as_bytes());
        Ok(STANDARD.encode(frame))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<Decrypted, QywxError> {
        let frame = STANDARD.decode(ciphertext).map_err(|e| QywxError::Decryption {
            message: "ciphertext is not valid base64".into(),
            source: Some(Box::new(e)),
        })?;
        if frame.len() < HEADER_LEN || frame[..PAD.len()] != PAD {
            return Err(decryption("frame header is corrupt"));
        }

        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&frame[PAD.len()..HEADER_LEN]);
        let len = u32::from_be_bytes(len_bytes) as usize;
        let body = &frame[HEADER_LEN..];
        if len > body.len() {
            return Err(decryption("frame length exceeds payload"));
        }

        let owner_id = String::from_utf8(body[len..].to_vec())
            .map_err(|_| decryption("owner id is not utf-8"))?;
        Ok(Decrypted {
            plaintext: body[..len].to_vec(),
            owner_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrypt_recovers_plaintext_and_owner() {
        let crypter = MockCrypter::new("wx5823bf96d3bd56c7");
        let ciphertext = crypter.encrypt(b"<xml>hi</xml>").unwrap();
        let decrypted = crypter.decrypt(&ciphertext).unwrap();
        assert_eq!(decrypted.plaintext, b"<xml>hi</xml>");
        assert_eq!(decrypted.owner_id, "wx5823bf96d3bd56c7");
    }

    #[test]
    fn garbage_is_a_decryption_error() {
        let crypter = MockCrypter::new("wx1");
        assert!(matches!(
            crypter.decrypt("not base64!"),
            Err(QywxError::Decryption { .. })
        ));
        assert!(matches!(
            crypter.decrypt(&STANDARD.encode(b"short")),
            Err(QywxError::Decryption { .. })
        ));
    }
}
