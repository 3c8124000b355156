//! 会话事件模型
//!
//! 协议会话只向核心投递三类事件：连接状态变化、新消息、凭据变化。
//! 字段命名沿用协议侧（camelCase），可直接从桥接帧反序列化。

use serde::{Deserialize, Serialize};

/// 协议侧报告的连接状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connecting,
    Open,
    Close,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectionUpdate {
    pub connection: Option<ConnectionState>,
    /// 配对二维码内容（首次登录时）
    pub qr: Option<String>,
    /// 已认证账号 ID，形如 `5215512345678:12@s.whatsapp.net`
    pub user_id: Option<String>,
    /// 断线状态码
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageKey {
    pub remote_jid: String,
    #[serde(default)]
    pub from_me: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCaption {
    #[serde(default)]
    pub caption: Option<String>,
}

/// 消息内容：依次尝试纯文本、扩展文本、图片说明、视频说明
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessageContent {
    pub conversation: Option<String>,
    pub extended_text_message: Option<TextBody>,
    pub image_message: Option<MediaCaption>,
    pub video_message: Option<MediaCaption>,
}

impl MessageContent {
    pub fn text(&self) -> Option<&str> {
        [
            self.conversation.as_deref(),
            self.extended_text_message.as_ref().and_then(|m| m.text.as_deref()),
            self.image_message.as_ref().and_then(|m| m.caption.as_deref()),
            self.video_message.as_ref().and_then(|m| m.caption.as_deref()),
        ]
        .into_iter()
        .flatten()
        .find(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub key: MessageKey,
    #[serde(default)]
    pub message: Option<MessageContent>,
}

impl InboundMessage {
    pub fn text(key: MessageKey, text: impl Into<String>) -> Self {
        Self {
            key,
            message: Some(MessageContent {
                conversation: Some(text.into()),
                ..Default::default()
            }),
        }
    }
}

/// 会话事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    #[serde(rename = "connection.update")]
    ConnectionUpdate(ConnectionUpdate),
    #[serde(rename = "messages.upsert")]
    MessagesUpsert { messages: Vec<InboundMessage> },
    #[serde(rename = "creds.update")]
    CredsUpdate { creds: serde_json::Value },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connection_close() {
        let json = r#"{"type":"connection.update","connection":"close","statusCode":401,"error":"logged out"}"#;
        let event: SessionEvent = serde_json::from_str(json).unwrap();
        match event {
            SessionEvent::ConnectionUpdate(update) => {
                assert_eq!(update.connection, Some(ConnectionState::Close));
                assert_eq!(update.status_code, Some(401));
                assert_eq!(update.qr, None);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_qr_only_update() {
        let json = r#"{"type":"connection.update","qr":"2@abc"}"#;
        let event: SessionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            SessionEvent::ConnectionUpdate(ConnectionUpdate {
                qr: Some("2@abc".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_parse_messages_upsert() {
        let json = r#"{"type":"messages.upsert","messages":[
            {"key":{"remoteJid":"5215511111111@s.whatsapp.net","fromMe":false},
             "message":{"extendedTextMessage":{"text":"hola"}}}]}"#;
        let event: SessionEvent = serde_json::from_str(json).unwrap();
        let SessionEvent::MessagesUpsert { messages } = event else {
            panic!("expected messages.upsert");
        };
        assert_eq!(messages[0].key.remote_jid, "5215511111111@s.whatsapp.net");
        assert_eq!(messages[0].message.as_ref().and_then(|m| m.text()), Some("hola"));
    }

    #[test]
    fn test_content_text_fallback_order() {
        let content = MessageContent {
            conversation: Some(String::new()),
            image_message: Some(MediaCaption {
                caption: Some("mira".into()),
            }),
            video_message: Some(MediaCaption {
                caption: Some("video".into()),
            }),
            ..Default::default()
        };
        assert_eq!(content.text(), Some("mira"));
        assert_eq!(MessageContent::default().text(), None);
    }
}
