//! 外部集成：协议桥接客户端、凭据文件存储、保活 HTTP 端点

pub mod auth_store;
pub mod bridge;
pub mod keepalive;

pub use auth_store::FileAuthStore;
pub use bridge::{BridgeCommand, BridgeConnector};
