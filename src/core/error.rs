//! 错误类型
//!
//! 会话层与流水线层各自的错误；生成式后端的错误见 `llm::LlmError`。

use thiserror::Error;

use crate::llm::LlmError;

/// 协议会话相关错误（建立连接、发送、帧解析、凭据读写）
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Session closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 应用层错误（启动与装配阶段）
#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}
