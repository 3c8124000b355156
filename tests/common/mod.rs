//! 集成测试共用的假协作方

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use autoreply::core::SessionError;
use autoreply::llm::{LlmClient, LlmError, MockLlmClient};
use autoreply::memory::{Message, Role};
use autoreply::responder::{IntentClassifier, MessagePipeline, ReplyCatalog, ReplyDispatcher};
use autoreply::session::{
    AuthStateStore, ConnectionState, ConnectionUpdate, InboundMessage, MessageKey, MessageSender,
    Session, SessionConnector, SessionEvent,
};
use tokio::sync::{mpsc, Notify};
use tokio::time::Instant;

pub const JID_A: &str = "5215511111111@s.whatsapp.net";
pub const JID_B: &str = "5215522222222@s.whatsapp.net";

/// 记录所有发出的消息，并转发到 channel 以便测试等待
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
    tx: mpsc::UnboundedSender<(String, String)>,
}

impl RecordingSender {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<(String, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                tx,
            }),
            rx,
        )
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, conversation_id: &str, text: &str) -> Result<(), SessionError> {
        let entry = (conversation_id.to_string(), text.to_string());
        self.sent.lock().unwrap().push(entry.clone());
        let _ = self.tx.send(entry);
        Ok(())
    }
}

pub struct FailingSender;

#[async_trait]
impl MessageSender for FailingSender {
    async fn send(&self, _conversation_id: &str, _text: &str) -> Result<(), SessionError> {
        Err(SessionError::Closed)
    }
}

/// 最后一条 user 消息为 "lento" 时挂起，直到 `release`
pub struct GatedLlm {
    gate: Notify,
}

impl GatedLlm {
    pub fn new() -> Self {
        Self {
            gate: Notify::new(),
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl LlmClient for GatedLlm {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let last = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        if last == "lento" {
            self.gate.notified().await;
        }
        Ok(format!("re: {last}"))
    }
}

pub fn pipeline_with(llm: Arc<dyn LlmClient>, cooldown: std::time::Duration) -> Arc<MessagePipeline> {
    Arc::new(MessagePipeline::new(
        IntentClassifier::new(),
        ReplyDispatcher::new(llm, ReplyCatalog::default()),
        cooldown,
        10,
    ))
}

pub fn mock_pipeline(mock: MockLlmClient) -> (Arc<MessagePipeline>, Arc<MockLlmClient>) {
    let mock = Arc::new(mock);
    let pipeline = pipeline_with(mock.clone(), std::time::Duration::from_secs(5));
    (pipeline, mock)
}

pub fn dm(jid: &str, text: &str) -> InboundMessage {
    InboundMessage::text(
        MessageKey {
            remote_jid: jid.to_string(),
            from_me: false,
        },
        text,
    )
}

pub fn open_event(user_id: &str) -> SessionEvent {
    SessionEvent::ConnectionUpdate(ConnectionUpdate {
        connection: Some(ConnectionState::Open),
        user_id: Some(user_id.to_string()),
        ..Default::default()
    })
}

pub fn close_event(code: Option<u16>) -> SessionEvent {
    SessionEvent::ConnectionUpdate(ConnectionUpdate {
        connection: Some(ConnectionState::Close),
        status_code: code,
        ..Default::default()
    })
}

pub enum Script {
    /// 建立失败
    Fail,
    /// 投递这些事件；`keep_open` 为 true 时事件流不结束
    Events {
        events: Vec<SessionEvent>,
        keep_open: bool,
    },
}

/// 按脚本逐次返回会话的假连接器
pub struct FakeConnector {
    scripts: Mutex<VecDeque<Script>>,
    sender: Arc<RecordingSender>,
    held: Mutex<Vec<mpsc::UnboundedSender<SessionEvent>>>,
    pub connects: Mutex<Vec<(Instant, Option<serde_json::Value>)>>,
}

impl FakeConnector {
    pub fn new(scripts: Vec<Script>, sender: Arc<RecordingSender>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            sender,
            held: Mutex::new(Vec::new()),
            connects: Mutex::new(Vec::new()),
        })
    }

    pub fn connect_count(&self) -> usize {
        self.connects.lock().unwrap().len()
    }

    pub fn connect_times(&self) -> Vec<Instant> {
        self.connects.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn creds_seen(&self) -> Vec<Option<serde_json::Value>> {
        self.connects.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }
}

#[async_trait]
impl SessionConnector for FakeConnector {
    async fn connect(&self, creds: Option<serde_json::Value>) -> Result<Session, SessionError> {
        self.connects.lock().unwrap().push((Instant::now(), creds));
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| SessionError::Connect("script exhausted".into()))?;
        match script {
            Script::Fail => Err(SessionError::Connect("refused".into())),
            Script::Events { events, keep_open } => {
                let (tx, rx) = mpsc::unbounded_channel();
                for event in events {
                    tx.send(event).unwrap();
                }
                if keep_open {
                    self.held.lock().unwrap().push(tx);
                }
                Ok(Session {
                    sender: self.sender.clone(),
                    events: rx,
                })
            }
        }
    }
}

/// 内存凭据存储
#[derive(Default)]
pub struct MemoryAuthStore {
    pub creds: Mutex<Option<serde_json::Value>>,
    pub saves: Mutex<usize>,
}

#[async_trait]
impl AuthStateStore for MemoryAuthStore {
    async fn load(&self) -> Result<Option<serde_json::Value>, SessionError> {
        Ok(self.creds.lock().unwrap().clone())
    }

    async fn save(&self, creds: &serde_json::Value) -> Result<(), SessionError> {
        *self.creds.lock().unwrap() = Some(creds.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
