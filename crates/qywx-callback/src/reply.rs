// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passive reply messages.
//!
//! A reply is rendered to plaintext XML and then handed to
//! [`CallbackEnvelope::respond`](crate::CallbackEnvelope::respond) for
//! encryption and signing.

use qywx_core::QywxError;

use crate::event::MessageHeader;
use crate::wire::XmlWriter;

/// One article of a news reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub pic_url: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyContent {
    Text {
        content: String,
    },
    Image {
        media_id: String,
    },
    Voice {
        media_id: String,
    },
    Video {
        media_id: String,
        title: String,
        description: String,
    },
    News(Vec<Article>),
}

impl ReplyContent {
    fn msg_type(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Voice { .. } => "voice",
            Self::Video { .. } => "video",
            Self::News(_) => "news",
        }
    }
}

/// A passive reply to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyMessage {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: i64,
    pub content: ReplyContent,
}

impl ReplyMessage {
    pub fn new(
        to_user_name: impl Into<String>,
        from_user_name: impl Into<String>,
        create_time: i64,
        content: ReplyContent,
    ) -> Self {
        Self {
            to_user_name: to_user_name.into(),
            from_user_name: from_user_name.into(),
            create_time,
            content,
        }
    }

    /// Addresses a reply back to the sender of `inbound`.
    pub fn answering(inbound: &MessageHeader, create_time: i64, content: ReplyContent) -> Self {
        Self::new(
            inbound.from_user_name.clone(),
            inbound.to_user_name.clone(),
            create_time,
            content,
        )
    }

    pub fn text(
        to_user_name: impl Into<String>,
        from_user_name: impl Into<String>,
        create_time: i64,
        content: impl Into<String>,
    ) -> Self {
        Self::new(
            to_user_name,
            from_user_name,
            create_time,
            ReplyContent::Text {
                content: content.into(),
            },
        )
    }

    pub fn image(
        to_user_name: impl Into<String>,
        from_user_name: impl Into<String>,
        create_time: i64,
        media_id: impl Into<String>,
    ) -> Self {
        Self::new(
            to_user_name,
            from_user_name,
            create_time,
            ReplyContent::Image {
                media_id: media_id.into(),
            },
        )
    }

    pub fn voice(
        to_user_name: impl Into<String>,
        from_user_name: impl Into<String>,
        create_time: i64,
        media_id: impl Into<String>,
    ) -> Self {
        Self::new(
            to_user_name,
            from_user_name,
            create_time,
            ReplyContent::Voice {
                media_id: media_id.into(),
            },
        )
    }

    pub fn news(
        to_user_name: impl Into<String>,
        from_user_name: impl Into<String>,
        create_time: i64,
        articles: Vec<Article>,
    ) -> Self {
        Self::new(
            to_user_name,
            from_user_name,
            create_time,
            ReplyContent::News(articles),
        )
    }

    /// Renders the plaintext XML the platform expects.
    pub fn to_xml(&self) -> Result<Vec<u8>, QywxError> {
        let mut xml = XmlWriter::new("xml")?;
        xml.cdata("ToUserName", &self.to_user_name)?;
        xml.cdata("FromUserName", &self.from_user_name)?;
        xml.text("CreateTime", &self.create_time.to_string())?;
        xml.cdata("MsgType", self.content.msg_type())?;

        match &self.content {
            ReplyContent::Text { content } => xml.cdata("Content", content)?,
            ReplyContent::Image { media_id } => {
                xml.start("Image")?;
                xml.cdata("MediaId", media_id)?;
                xml.end("Image")?;
            }
            ReplyContent::Voice { media_id } => {
                xml.start("Voice")?;
                xml.cdata("MediaId", media_id)?;
                xml.end("Voice")?;
            }
            ReplyContent::Video {
                media_id,
                title,
                description,
            } => {
                xml.start("Video")?;
                xml.cdata("MediaId", media_id)?;
                xml.cdata("Title", title)?;
                xml.cdata("Description", description)?;
                xml.end("Video")?;
            }
            ReplyContent::News(articles) => {
                xml.text("ArticleCount", &articles.len().to_string())?;
                xml.start("Articles")?;
                for article in articles {
                    xml.start("item")?;
                    xml.cdata("Title", &article.title)?;
                    xml.cdata("Description", &article.description)?;
                    xml.cdata("PicUrl", &article.pic_url)?;
                    xml.cdata("Url", &article.url)?;
                    xml.end("item")?;
                }
                xml.end("Articles")?;
            }
        }

        xml.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_reply_layout() {
        let reply = ReplyMessage::text("zhangsan", "wx1", 1_400_000_000, "hi <there>");
        let xml = String::from_utf8(reply.to_xml().unwrap()).unwrap();
        assert_eq!(
            xml,
            "<xml><ToUserName><![CDATA[zhangsan]]></ToUserName>\
             <FromUserName><![CDATA[wx1]]></FromUserName>\
             <CreateTime>1400000000</CreateTime>\
             <MsgType><![CDATA[text]]></MsgType>\
             <Content><![CDATA[hi <there>]]></Content></xml>"
        );
    }

    #[test]
    fn answering_swaps_sender_and_recipient() {
        let inbound = MessageHeader {
            to_user_name: "wx1".into(),
            from_user_name: "lisi".into(),
            msg_type: "text".into(),
            ..MessageHeader::default()
        };
        let reply = ReplyMessage::answering(
            &inbound,
            1,
            ReplyContent::Image {
                media_id: "m1".into(),
            },
        );
        assert_eq!(reply.to_user_name, "lisi");
        assert_eq!(reply.from_user_name, "wx1");
        let xml = String::from_utf8(reply.to_xml().unwrap()).unwrap();
        assert!(xml.contains("<Image><MediaId><![CDATA[m1]]></MediaId></Image>"));
    }

    #[test]
    fn news_reply_counts_articles() {
        let reply = ReplyMessage::news(
            "u",
            "wx1",
            1,
            vec![
                Article {
                    title: "One".into(),
                    url: "https://example.com/1?a=1&b=2".into(),
                    ..Article::default()
                },
                Article {
                    title: "Two".into(),
                    ..Article::default()
                },
            ],
        );
        let xml = String::from_utf8(reply.to_xml().unwrap()).unwrap();
        assert!(xml.contains("<MsgType><![CDATA[news]]></MsgType><ArticleCount>2</ArticleCount>"));
        assert!(xml.contains("<Url><![CDATA[https://example.com/1?a=1&b=2]]></Url>"));
        assert_eq!(xml.matches("<item>").count(), 2);
    }

    #[test]
    fn video_reply_nests_fields() {
        let reply = ReplyMessage::new(
            "u",
            "wx1",
            1,
            ReplyContent::Video {
                media_id: "v1".into(),
                title: "T".into(),
                description: "D".into(),
            },
        );
        let xml = String::from_utf8(reply.to_xml().unwrap()).unwrap();
        assert!(xml.contains(
            "<Video><MediaId><![CDATA[v1]]></MediaId><Title><![CDATA[T]]></Title>\
             <Description><![CDATA[D]]></Description></Video>"
        ));
    }
}
