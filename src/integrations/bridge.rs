//! 协议桥接客户端
//!
//! 通过 WebSocket 连接本地的协议桥接进程（负责 WhatsApp Web 协议本身），双向交换 JSON 帧：
//!
//! - 出站：连接后先发 `{"type":"hello","creds":...}`，回复用 `{"type":"send","to":...,"text":...}`
//! - 入站：`connection.update` / `messages.upsert` / `creds.update`（见 `SessionEvent`）
//!
//! 底层连接断开而桥接未发送 close 更新时，补发一个无状态码的 close 事件。
//! `Session` 的事件接收端被丢弃后，读写两个任务都退出，并向桥接发送 Close 帧关闭连接。

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_util::sync::CancellationToken;

use crate::core::SessionError;
use crate::session::{
    ConnectionState, ConnectionUpdate, MessageSender, Session, SessionConnector, SessionEvent,
};

/// 发给桥接进程的指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeCommand {
    Hello { creds: Option<serde_json::Value> },
    Send { to: String, text: String },
}

pub struct BridgeConnector {
    url: String,
}

impl BridgeConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// 解析一条入站帧
pub fn parse_frame(text: &str) -> Result<SessionEvent, SessionError> {
    serde_json::from_str(text).map_err(|e| SessionError::Protocol(e.to_string()))
}

fn socket_closed_event() -> SessionEvent {
    SessionEvent::ConnectionUpdate(ConnectionUpdate {
        connection: Some(ConnectionState::Close),
        error: Some("bridge socket closed".to_string()),
        ..Default::default()
    })
}

#[async_trait]
impl SessionConnector for BridgeConnector {
    async fn connect(&self, creds: Option<serde_json::Value>) -> Result<Session, SessionError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| SessionError::Connect(format!("{}: {}", self.url, e)))?;
        tracing::info!(url = %self.url, "connected to protocol bridge");

        let (mut ws_tx, mut ws_rx) = ws_stream.split();
        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<BridgeCommand>();
        let (events_tx, events_rx) = mpsc::unbounded_channel::<SessionEvent>();

        command_tx
            .send(BridgeCommand::Hello { creds })
            .map_err(|_| SessionError::Closed)?;

        // 读任务退出（连接断开或会话被丢弃）时通知写任务关闭连接
        let stop = CancellationToken::new();

        let writer_stop = stop.clone();
        tokio::spawn(async move {
            loop {
                let command = tokio::select! {
                    _ = writer_stop.cancelled() => break,
                    command = command_rx.recv() => match command {
                        Some(command) => command,
                        None => break,
                    },
                };
                let json = match serde_json::to_string(&command) {
                    Ok(j) => j,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to encode bridge command");
                        continue;
                    }
                };
                if let Err(e) = ws_tx.send(WsMessage::Text(json)).await {
                    tracing::warn!(error = %e, "bridge write failed");
                    break;
                }
            }
            let _ = ws_tx.send(WsMessage::Close(None)).await;
            let _ = ws_tx.close().await;
            tracing::debug!("bridge writer closed");
        });

        tokio::spawn(async move {
            let _guard = stop.drop_guard();
            let mut close_seen = false;
            loop {
                let frame = tokio::select! {
                    _ = events_tx.closed() => {
                        tracing::debug!("session dropped, closing bridge socket");
                        return;
                    }
                    frame = ws_rx.next() => frame,
                };
                let text = match frame {
                    Some(Ok(WsMessage::Text(text))) => text,
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "bridge read failed");
                        break;
                    }
                };
                let event = match parse_frame(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring malformed bridge frame");
                        continue;
                    }
                };
                if let SessionEvent::ConnectionUpdate(ConnectionUpdate {
                    connection: Some(ConnectionState::Close),
                    ..
                }) = &event
                {
                    close_seen = true;
                }
                if events_tx.send(event).is_err() {
                    return;
                }
            }
            if !close_seen {
                let _ = events_tx.send(socket_closed_event());
            }
        });

        Ok(Session {
            sender: Arc::new(BridgeSender { tx: command_tx }),
            events: events_rx,
        })
    }
}

/// 经桥接发送文本消息
pub struct BridgeSender {
    tx: mpsc::UnboundedSender<BridgeCommand>,
}

#[async_trait]
impl MessageSender for BridgeSender {
    async fn send(&self, conversation_id: &str, text: &str) -> Result<(), SessionError> {
        self.tx
            .send(BridgeCommand::Send {
                to: conversation_id.to_string(),
                text: text.to_string(),
            })
            .map_err(|_| SessionError::Closed)
    }
}
