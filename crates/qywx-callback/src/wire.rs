// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outer XML wire format of callback envelopes.
//!
//! Text fields are written as CDATA so receivers treat them literally. A
//! value containing `]]>` is split across adjacent CDATA sections.

use qywx_core::QywxError;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// The outer structure of an inbound callback body.
///
/// `ToUserName` and `AgentID` are routing hints only and are never trusted
/// for authorization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundEnvelope {
    #[serde(rename = "ToUserName", default)]
    pub to_user_name: Option<String>,
    #[serde(rename = "AgentID", default)]
    pub agent_id: Option<String>,
    #[serde(rename = "Encrypt")]
    pub encrypt: String,
}

/// The fields of an outbound passive reply envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutboundEnvelope {
    #[serde(rename = "Encrypt")]
    pub encrypt: String,
    #[serde(rename = "MsgSignature")]
    pub msg_signature: String,
    #[serde(rename = "TimeStamp")]
    pub timestamp: i64,
    #[serde(rename = "Nonce")]
    pub nonce: String,
}

/// Decodes an XML document into `T`.
pub fn from_xml<T: DeserializeOwned>(xml: &[u8], what: &str) -> Result<T, QywxError> {
    let text = std::str::from_utf8(xml)
        .map_err(|e| QywxError::decode(format!("{what} is not valid UTF-8"), e))?;
    quick_xml::de::from_str(text).map_err(|e| QywxError::decode(format!("malformed {what}"), e))
}

impl InboundEnvelope {
    pub fn from_xml(body: &[u8]) -> Result<Self, QywxError> {
        from_xml(body, "callback envelope")
    }
}

impl OutboundEnvelope {
    pub fn from_xml(body: &[u8]) -> Result<Self, QywxError> {
        from_xml(body, "reply envelope")
    }

    /// Serializes the envelope as `<xml>` with CDATA-wrapped text fields and
    /// a plain integer `TimeStamp`.
    pub fn to_xml(&self) -> Result<Vec<u8>, QywxError> {
        let mut xml = XmlWriter::new("xml")?;
        xml.cdata("Encrypt", &self.encrypt)?;
        xml.cdata("MsgSignature", &self.msg_signature)?;
        xml.text("TimeStamp", &self.timestamp.to_string())?;
        xml.cdata("Nonce", &self.nonce)?;
        xml.finish()
    }
}

/// Splits `value` so no segment contains `]]>`.
pub fn cdata_segments(value: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut rest = value;
    while let Some(pos) = rest.find("]]>") {
        segments.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    segments.push(rest);
    segments
}

fn write_error(e: impl std::fmt::Display) -> QywxError {
    QywxError::Internal(format!("failed to write XML: {e}"))
}

/// Minimal element writer over `quick_xml::Writer`.
pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
    root: &'static str,
}

impl XmlWriter {
    pub(crate) fn new(root: &'static str) -> Result<Self, QywxError> {
        let mut inner = Writer::new(Vec::new());
        inner
            .write_event(Event::Start(BytesStart::new(root)))
            .map_err(write_error)?;
        Ok(Self { inner, root })
    }

    pub(crate) fn start(&mut self, name: &str) -> Result<(), QywxError> {
        self.inner
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(write_error)
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<(), QywxError> {
        self.inner
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(write_error)
    }

    /// `<name><![CDATA[value]]></name>`
    pub(crate) fn cdata(&mut self, name: &str, value: &str) -> Result<(), QywxError> {
        self.start(name)?;
        for segment in cdata_segments(value) {
            self.inner
                .write_event(Event::CData(BytesCData::new(segment)))
                .map_err(write_error)?;
        }
        self.end(name)
    }

    /// `<name>value</name>` with markup escaped.
    pub(crate) fn text(&mut self, name: &str, value: &str) -> Result<(), QywxError> {
        self.start(name)?;
        self.inner
            .write_event(Event::Text(BytesText::new(value)))
            .map_err(write_error)?;
        self.end(name)
    }

    pub(crate) fn finish(mut self) -> Result<Vec<u8>, QywxError> {
        let root = self.root;
        self.end(root)?;
        Ok(self.inner.into_inner())
    }
}
