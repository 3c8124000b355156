//! 会话层：事件模型、外部协作方接口、断线分类、连接生命周期

pub mod address;
pub mod client;
pub mod disconnect;
pub mod event;
pub mod lifecycle;

pub use address::{extract_text, is_broadcast, own_address, pairing_url};
pub use client::{AuthStateStore, MessageSender, Session, SessionConnector};
pub use disconnect::{DisconnectKind, DisconnectReason};
pub use event::{
    ConnectionState, ConnectionUpdate, InboundMessage, MessageContent, MessageKey, SessionEvent,
};
pub use lifecycle::{ConnectionLifecycle, LifecycleOutcome, LifecycleState};
