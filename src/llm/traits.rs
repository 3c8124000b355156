//! LLM 客户端抽象
//!
//! 后端接收按顺序排列的角色消息（system 前言 + 历史 + 新的 user 消息），返回生成文本或失败。
//! 调用方对所有失败一视同仁（配额、网络、响应格式）。

use async_trait::async_trait;
use thiserror::Error;

use crate::memory::Message;

/// 生成式后端错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Empty response")]
    EmptyResponse,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// 后端标识（用于日志）
    fn model_name(&self) -> &str {
        "unknown"
    }
}
