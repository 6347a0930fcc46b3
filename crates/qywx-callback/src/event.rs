// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decoded inbound callback payloads.
//!
//! Decoding is two-step: a first pass reads only the discriminator fields, then
//! the plaintext is decoded again into the variant that pass selected.

use qywx_core::QywxError;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::wire::from_xml;

/// Fields common to every corp message and event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageHeader {
    /// Recipient (the corp id).
    pub to_user_name: String,
    /// Sender (the member's user id).
    pub from_user_name: String,
    pub create_time: i64,
    /// Declared message kind (`text`, `image`, ..., `event`).
    pub msg_type: String,
    /// Event sub-kind when `msg_type` is `event`.
    #[serde(default)]
    pub event: Option<String>,
    #[serde(rename = "AgentID", default)]
    pub agent_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextMessage {
    #[serde(skip)]
    pub header: MessageHeader,
    pub msg_id: u64,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageMessage {
    #[serde(skip)]
    pub header: MessageHeader,
    pub msg_id: u64,
    pub pic_url: String,
    pub media_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceMessage {
    #[serde(skip)]
    pub header: MessageHeader,
    pub msg_id: u64,
    pub media_id: String,
    pub format: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoMessage {
    #[serde(skip)]
    pub header: MessageHeader,
    pub msg_id: u64,
    pub media_id: String,
    pub thumb_media_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocationMessage {
    #[serde(skip)]
    pub header: MessageHeader,
    pub msg_id: u64,
    #[serde(rename = "Location_X")]
    pub location_x: f64,
    #[serde(rename = "Location_Y")]
    pub location_y: f64,
    pub scale: i32,
    pub label: String,
}

/// Subscribe and unsubscribe events carry nothing beyond the header.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubscriptionEvent {
    #[serde(skip)]
    pub header: MessageHeader,
}

/// Periodic location report from a member's client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocationReportEvent {
    #[serde(skip)]
    pub header: MessageHeader,
    pub latitude: f64,
    pub longitude: f64,
    pub precision: f64,
}

/// Menu click and view events, and entering an agent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyedEvent {
    #[serde(skip)]
    pub header: MessageHeader,
    #[serde(default)]
    pub event_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanCodeInfo {
    pub scan_type: String,
    pub scan_result: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanCodeEvent {
    #[serde(skip)]
    pub header: MessageHeader,
    pub event_key: String,
    pub scan_code_info: ScanCodeInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PicItem {
    pub pic_md5_sum: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PicList {
    #[serde(rename = "item", default)]
    pub items: Vec<PicItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendPicsInfo {
    pub count: u32,
    #[serde(default)]
    pub pic_list: PicList,
}

/// Photo picker events (system camera, camera or album, in-app picker).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PicEvent {
    #[serde(skip)]
    pub header: MessageHeader,
    pub event_key: String,
    pub send_pics_info: SendPicsInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendLocationInfo {
    #[serde(rename = "Location_X")]
    pub location_x: f64,
    #[serde(rename = "Location_Y")]
    pub location_y: f64,
    pub scale: i32,
    pub label: String,
    #[serde(default)]
    pub poiname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocationSelectEvent {
    #[serde(skip)]
    pub header: MessageHeader,
    pub event_key: String,
    pub send_location_info: SendLocationInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchJob {
    pub job_id: String,
    pub job_type: String,
    pub err_code: i64,
    pub err_msg: String,
}

/// Completion of an asynchronous batch job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchJobResultEvent {
    #[serde(skip)]
    pub header: MessageHeader,
    pub batch_job: BatchJob,
}

/// A suite ticket push. The ticket replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SuiteTicketEvent {
    pub suite_id: String,
    pub info_type: String,
    pub time_stamp: i64,
    pub suite_ticket: String,
}

/// A corp changed or cancelled its authorization of the suite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SuiteAuthEvent {
    pub suite_id: String,
    pub info_type: String,
    pub time_stamp: i64,
    pub auth_corp_id: String,
}

/// A decoded inbound callback.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackEvent {
    Text(TextMessage),
    Image(ImageMessage),
    Voice(VoiceMessage),
    Video(VideoMessage),
    Location(LocationMessage),
    Subscribe(SubscriptionEvent),
    Unsubscribe(SubscriptionEvent),
    LocationReport(LocationReportEvent),
    MenuClick(KeyedEvent),
    MenuView(KeyedEvent),
    /// `scancode_push` or `scancode_waitmsg`; see `header.event`.
    ScanCode(ScanCodeEvent),
    /// `pic_sysphoto`, `pic_photo_or_album` or `pic_weixin`; see `header.event`.
    PicSelect(PicEvent),
    LocationSelect(LocationSelectEvent),
    EnterAgent(KeyedEvent),
    BatchJobResult(BatchJobResultEvent),
    SuiteTicket(SuiteTicketEvent),
    ChangeAuth(SuiteAuthEvent),
    CancelAuth(SuiteAuthEvent),
}

impl CallbackEvent {
    /// The declared kind: the event sub-kind for events, the info type for
    /// suite notices, the message type otherwise.
    pub fn kind(&self) -> &str {
        match self {
            Self::SuiteTicket(e) => &e.info_type,
            Self::ChangeAuth(e) | Self::CancelAuth(e) => &e.info_type,
            other => other.header().map_or("", |h| {
                h.event.as_deref().unwrap_or(h.msg_type.as_str())
            }),
        }
    }

    /// The common corp header. `None` for suite notices.
    pub fn header(&self) -> Option<&MessageHeader> {
        let header = match self {
            Self::Text(m) => &m.header,
            Self::Image(m) => &m.header,
            Self::Voice(m) => &m.header,
            Self::Video(m) => &m.header,
            Self::Location(m) => &m.header,
            Self::Subscribe(e) | Self::Unsubscribe(e) => &e.header,
            Self::LocationReport(e) => &e.header,
            Self::MenuClick(e) | Self::MenuView(e) | Self::EnterAgent(e) => &e.header,
            Self::ScanCode(e) => &e.header,
            Self::PicSelect(e) => &e.header,
            Self::LocationSelect(e) => &e.header,
            Self::BatchJobResult(e) => &e.header,
            Self::SuiteTicket(_) | Self::ChangeAuth(_) | Self::CancelAuth(_) => return None,
        };
        Some(header)
    }
}

trait WithHeader: DeserializeOwned {
    fn set_header(&mut self, header: MessageHeader);
}

macro_rules! with_header {
    ($($ty:ty),* $(,)?) => {
        $(impl WithHeader for $ty {
            fn set_header(&mut self, header: MessageHeader) {
                self.header = header;
            }
        })*
    };
}

with_header!(
    TextMessage,
    ImageMessage,
    VoiceMessage,
    VideoMessage,
    LocationMessage,
    SubscriptionEvent,
    LocationReportEvent,
    KeyedEvent,
    ScanCodeEvent,
    PicEvent,
    LocationSelectEvent,
    BatchJobResultEvent,
);

fn body<T: WithHeader>(plaintext: &[u8], header: MessageHeader) -> Result<T, QywxError> {
    let mut value: T = from_xml(plaintext, "callback payload")?;
    value.set_header(header);
    Ok(value)
}

/// Decodes a corp callback plaintext, dispatching on `MsgType` and `Event`.
pub fn decode_corp(plaintext: &[u8]) -> Result<CallbackEvent, QywxError> {
    let header: MessageHeader = from_xml(plaintext, "callback payload")?;

    let event = match header.msg_type.as_str() {
        "text" => CallbackEvent::Text(body(plaintext, header)?),
        "image" => CallbackEvent::Image(body(plaintext, header)?),
        "voice" => CallbackEvent::Voice(body(plaintext, header)?),
        "video" => CallbackEvent::Video(body(plaintext, header)?),
        "location" => CallbackEvent::Location(body(plaintext, header)?),
        "event" => {
            let Some(sub_kind) = header.event.clone() else {
                return Err(QywxError::Decode {
                    message: "event payload has no Event field".into(),
                    source: None,
                });
            };
            // The platform has sent both casings for LOCATION, CLICK and VIEW.
            match sub_kind.to_ascii_lowercase().as_str() {
                "subscribe" => CallbackEvent::Subscribe(body(plaintext, header)?),
                "unsubscribe" => CallbackEvent::Unsubscribe(body(plaintext, header)?),
                "location" => CallbackEvent::LocationReport(body(plaintext, header)?),
                "click" => CallbackEvent::MenuClick(body(plaintext, header)?),
                "view" => CallbackEvent::MenuView(body(plaintext, header)?),
                "scancode_push" | "scancode_waitmsg" => {
                    CallbackEvent::ScanCode(body(plaintext, header)?)
                }
                "pic_sysphoto" | "pic_photo_or_album" | "pic_weixin" => {
                    CallbackEvent::PicSelect(body(plaintext, header)?)
                }
                "location_select" => CallbackEvent::LocationSelect(body(plaintext, header)?),
                "enter_agent" => CallbackEvent::EnterAgent(body(plaintext, header)?),
                "batch_job_result" => CallbackEvent::BatchJobResult(body(plaintext, header)?),
                _ => return Err(QywxError::UnknownMessageType { kind: sub_kind }),
            }
        }
        other => {
            return Err(QywxError::UnknownMessageType {
                kind: other.to_string(),
            });
        }
    };
    Ok(event)
}

#[derive(Deserialize)]
struct SuiteKind {
    #[serde(rename = "InfoType")]
    info_type: String,
}

/// Decodes a suite callback plaintext, dispatching on `InfoType`.
pub fn decode_suite(plaintext: &[u8]) -> Result<CallbackEvent, QywxError> {
    let head: SuiteKind = from_xml(plaintext, "suite notice")?;
    match head.info_type.as_str() {
        "suite_ticket" => Ok(CallbackEvent::SuiteTicket(from_xml(plaintext, "suite notice")?)),
        "change_auth" => Ok(CallbackEvent::ChangeAuth(from_xml(plaintext, "suite notice")?)),
        "cancel_auth" => Ok(CallbackEvent::CancelAuth(from_xml(plaintext, "suite notice")?)),
        _ => Err(QywxError::UnknownMessageType {
            kind: head.info_type,
        }),
    }
}
