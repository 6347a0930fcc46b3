// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secure callback envelope.
//!
//! Inbound callbacks are verified, decrypted, checked against the expected
//! owner, and decoded into a [`CallbackEvent`]. Outbound passive replies are
//! encrypted, signed, and wrapped. The cipher itself is supplied through
//! [`qywx_core::MessageCrypter`].

pub mod envelope;
pub mod event;
pub mod reply;
pub mod signature;
pub mod wire;

pub use envelope::{CallbackEnvelope, Dialect};
pub use event::{CallbackEvent, MessageHeader};
pub use reply::{Article, ReplyContent, ReplyMessage};
