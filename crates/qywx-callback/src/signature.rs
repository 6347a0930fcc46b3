// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback signature: SHA-1 over the sorted `key=value` join of the signing
//! token, timestamp, nonce, and ciphertext, as lowercase hex.

use sha1::{Digest, Sha1};

/// Computes the signature for one envelope.
pub fn sign(token: &str, timestamp: &str, nonce: &str, encrypt: &str) -> String {
    let mut fields = [
        ("token", token),
        ("timestamp", timestamp),
        ("nonce", nonce),
        ("encrypt", encrypt),
    ];
    fields.sort_unstable_by_key(|(key, _)| *key);

    let joined = fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    hex::encode(Sha1::digest(joined.as_bytes()))
}

/// Returns true if `signature` matches the one computed over the other fields.
///
/// Compares in constant time with respect to the signature contents.
pub fn verify(signature: &str, token: &str, timestamp: &str, nonce: &str, encrypt: &str) -> bool {
    let expected = sign(token, timestamp, nonce, encrypt);
    let (a, b) = (expected.as_bytes(), signature.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
