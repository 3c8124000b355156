//! Autoreply - WhatsApp 自动应答机器人
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量 + .env）
//! - **core**: 错误类型、断线恢复策略、优雅关闭
//! - **integrations**: 外部协作方（协议桥接客户端、凭据文件存储、保活 HTTP 端点）
//! - **llm**: 生成式后端抽象与实现（OpenAI 兼容 / Gemini / Mock）
//! - **memory**: 对话消息模型与按会话的有界历史
//! - **observability**: 日志初始化
//! - **responder**: 消息处理流水线（意图分类、冷却、回复分发、会话通道）
//! - **session**: 会话事件模型、连接生命周期状态机

pub mod config;
pub mod core;
pub mod integrations;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod responder;
pub mod session;

pub use responder::{IntentClassifier, MessagePipeline};
pub use session::{ConnectionLifecycle, LifecycleOutcome};
