//! 外部协作方接口
//!
//! - `SessionConnector`：建立一次协议会话，返回发送端与事件流
//! - `MessageSender`：唯一的出站原语 `send(会话 ID, 文本)`
//! - `AuthStateStore`：凭据的加载与保存（内容对核心不透明）

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::SessionError;

use super::event::SessionEvent;

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, conversation_id: &str, text: &str) -> Result<(), SessionError>;
}

/// 一次已建立的会话：发送端 + 事件流（事件流结束即会话结束）
pub struct Session {
    pub sender: Arc<dyn MessageSender>,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
}

#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn connect(&self, creds: Option<serde_json::Value>) -> Result<Session, SessionError>;
}

#[async_trait]
pub trait AuthStateStore: Send + Sync {
    /// 尚无凭据时返回 None（需要扫码配对）
    async fn load(&self) -> Result<Option<serde_json::Value>, SessionError>;

    async fn save(&self, creds: &serde_json::Value) -> Result<(), SessionError>;
}
