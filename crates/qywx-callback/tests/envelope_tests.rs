// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the callback envelope state machine.

use std::sync::Arc;

use qywx_callback::signature;
use qywx_callback::wire::OutboundEnvelope;
use qywx_callback::{CallbackEnvelope, CallbackEvent, ReplyMessage};
use qywx_core::{MessageCrypter, QywxError};
use qywx_test_utils::fixtures::{CALLBACK_TOKEN, CORP_ID, SUITE_ID};
use qywx_test_utils::{ManualClock, MockCrypter, fixtures};

fn corp_envelope() -> CallbackEnvelope {
    CallbackEnvelope::for_corp(CORP_ID, CALLBACK_TOKEN, Arc::new(MockCrypter::new(CORP_ID)))
        .with_clock(Arc::new(ManualClock::default()))
}

/// Builds an inbound callback the way the platform would: encrypt, sign,
/// and wrap in an outer body.
fn inbound(crypter: &MockCrypter, plaintext: &str) -> (Vec<u8>, String, String, String) {
    let encrypt = crypter.encrypt(plaintext.as_bytes()).unwrap();
    let timestamp = "1409659813".to_string();
    let nonce = "1372623149".to_string();
    let sig = signature::sign(CALLBACK_TOKEN, &timestamp, &nonce, &encrypt);
    let body = format!(
        "<xml><ToUserName><![CDATA[{CORP_ID}]]></ToUserName>\
         <AgentID><![CDATA[218]]></AgentID>\
         <Encrypt><![CDATA[{encrypt}]]></Encrypt></xml>"
    );
    (body.into_bytes(), sig, timestamp, nonce)
}

#[test]
fn parse_accepts_a_platform_callback() {
    let (body, sig, ts, nonce) = inbound(&MockCrypter::new(CORP_ID), fixtures::CLICK_EVENT);
    let event = corp_envelope().parse(&body, &sig, &ts, &nonce).unwrap();
    assert!(matches!(event, CallbackEvent::MenuClick(ref e) if e.event_key == "V1001_TODAY_MUSIC"));
}

#[test]
fn respond_then_parse_round_trips() {
    let envelope = corp_envelope();
    let wire = envelope.respond(fixtures::TEXT_MESSAGE.as_bytes()).unwrap();

    let outbound = OutboundEnvelope::from_xml(&wire).unwrap();
    assert_eq!(outbound.timestamp, 1_400_000_000);
    assert_eq!(outbound.nonce.len(), 10);

    let event = envelope
        .parse(
            &wire,
            &outbound.msg_signature,
            &outbound.timestamp.to_string(),
            &outbound.nonce,
        )
        .unwrap();
    let CallbackEvent::Text(msg) = event else {
        panic!("expected text message, got {event:?}");
    };
    assert_eq!(msg.header.msg_type, "text");
    assert_eq!(msg.header.to_user_name, CORP_ID);
    assert_eq!(msg.content, "hello <b>world</b> ]]> done");
    assert_eq!(msg.msg_id, 4561255354251345929);
}

#[test]
fn reply_message_round_trips_through_respond() {
    let envelope = corp_envelope();
    let reply = ReplyMessage::text("zhangsan", CORP_ID, 1_400_000_000, "pong");
    let wire = envelope.respond_with(&reply).unwrap();

    let outbound = OutboundEnvelope::from_xml(&wire).unwrap();
    assert!(signature::verify(
        &outbound.msg_signature,
        CALLBACK_TOKEN,
        &outbound.timestamp.to_string(),
        &outbound.nonce,
        &outbound.encrypt,
    ));
    let plaintext = MockCrypter::new(CORP_ID).decrypt(&outbound.encrypt).unwrap();
    assert_eq!(plaintext.plaintext, reply.to_xml().unwrap());
}

#[test]
fn tampered_ciphertext_is_rejected() {
    let crypter = MockCrypter::new(CORP_ID);
    let (body, sig, ts, nonce) = inbound(&crypter, fixtures::TEXT_MESSAGE);

    let text = String::from_utf8(body).unwrap();
    let start = text.find("<Encrypt><![CDATA[").unwrap() + "<Encrypt><![CDATA[".len();
    let mut bytes = text.into_bytes();
    bytes[start + 5] = if bytes[start + 5] == b'A' { b'B' } else { b'A' };

    let err = corp_envelope().parse(&bytes, &sig, &ts, &nonce).unwrap_err();
    assert!(matches!(err, QywxError::SignatureMismatch), "got: {err}");
}

#[test]
fn tampered_signature_is_rejected() {
    let (body, sig, ts, nonce) = inbound(&MockCrypter::new(CORP_ID), fixtures::TEXT_MESSAGE);
    let mut tampered = sig.into_bytes();
    tampered[0] = if tampered[0] == b'0' { b'1' } else { b'0' };
    let tampered = String::from_utf8(tampered).unwrap();

    let err = corp_envelope().parse(&body, &tampered, &ts, &nonce).unwrap_err();
    assert!(matches!(err, QywxError::SignatureMismatch), "got: {err}");
}

#[test]
fn validly_signed_garbage_fails_decryption() {
    let encrypt = "bm90IGEgZnJhbWU=";
    let sig = signature::sign(CALLBACK_TOKEN, "1", "2", encrypt);
    let body = format!("<xml><Encrypt><![CDATA[{encrypt}]]></Encrypt></xml>");

    let err = corp_envelope()
        .parse(body.as_bytes(), &sig, "1", "2")
        .unwrap_err();
    assert!(matches!(err, QywxError::Decryption { .. }), "got: {err}");
}

#[test]
fn payload_for_another_tenant_is_rejected() {
    let (body, sig, ts, nonce) = inbound(&MockCrypter::new("wx-other-corp"), fixtures::TEXT_MESSAGE);

    let err = corp_envelope().parse(&body, &sig, &ts, &nonce).unwrap_err();
    match err {
        QywxError::TenantMismatch { expected, actual } => {
            assert_eq!(expected, CORP_ID);
            assert_eq!(actual, "wx-other-corp");
        }
        other => panic!("expected tenant mismatch, got: {other}"),
    }
}

#[test]
fn unknown_message_type_is_rejected() {
    let (body, sig, ts, nonce) = inbound(&MockCrypter::new(CORP_ID), fixtures::UNKNOWN_MESSAGE);
    let err = corp_envelope().parse(&body, &sig, &ts, &nonce).unwrap_err();
    assert!(
        matches!(err, QywxError::UnknownMessageType { ref kind } if kind == "sticker"),
        "got: {err}"
    );
}

#[test]
fn malformed_body_is_decode_error() {
    let err = corp_envelope()
        .parse(b"<xml><Encrypt>", "sig", "1", "2")
        .unwrap_err();
    assert!(matches!(err, QywxError::Decode { .. }), "got: {err}");
}

#[test]
fn suite_envelope_parses_ticket_and_never_replies() {
    let crypter = MockCrypter::new(SUITE_ID);
    let envelope = CallbackEnvelope::for_suite(SUITE_ID, CALLBACK_TOKEN, Arc::new(crypter.clone()));

    let (body, sig, ts, nonce) = inbound(&crypter, fixtures::SUITE_TICKET);
    let event = envelope.parse(&body, &sig, &ts, &nonce).unwrap();
    assert!(matches!(event, CallbackEvent::SuiteTicket(ref t) if t.suite_ticket == "asdfasfdasdfasdf"));

    assert!(envelope.respond(b"success").unwrap().is_empty());
}

#[test]
fn suite_passive_reply_can_be_enabled() {
    let envelope =
        CallbackEnvelope::for_suite(SUITE_ID, CALLBACK_TOKEN, Arc::new(MockCrypter::new(SUITE_ID)))
            .with_passive_reply(true);
    assert!(!envelope.respond(b"success").unwrap().is_empty());
}

#[test]
fn corp_payload_to_suite_endpoint_is_malformed() {
    let crypter = MockCrypter::new(SUITE_ID);
    let envelope = CallbackEnvelope::for_suite(SUITE_ID, CALLBACK_TOKEN, Arc::new(crypter.clone()));
    let (body, sig, ts, nonce) = inbound(&crypter, fixtures::TEXT_MESSAGE);
    assert!(matches!(
        envelope.parse(&body, &sig, &ts, &nonce),
        Err(QywxError::Decode { .. })
    ));
}

#[test]
fn verify_url_returns_the_echo() {
    let crypter = MockCrypter::new(CORP_ID);
    let echostr = crypter.encrypt(b"4916331957181327489").unwrap();
    let sig = signature::sign(CALLBACK_TOKEN, "1409659589", "263014780", &echostr);

    let echo = corp_envelope()
        .verify_url(&sig, "1409659589", "263014780", &echostr)
        .unwrap();
    assert_eq!(echo, "4916331957181327489");

    let err = corp_envelope()
        .verify_url("0000", "1409659589", "263014780", &echostr)
        .unwrap_err();
    assert!(matches!(err, QywxError::SignatureMismatch));
}
