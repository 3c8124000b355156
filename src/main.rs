//! Autoreply - WhatsApp 自动应答机器人
//!
//! 入口：加载 .env 与配置、初始化日志、启动保活端点，然后运行连接生命周期直到收到关闭信号。
//!
//! 环境变量:
//! - GEMINI_API_KEY: 生成式后端 API Key
//! - PORT: 保活端点端口（默认 3000）
//! - AUTOREPLY__SESSION__BRIDGE_URL: 协议桥接地址（默认 ws://127.0.0.1:8787）

use std::sync::Arc;

use anyhow::Context;
use autoreply::config::load_config;
use autoreply::core::ShutdownManager;
use autoreply::integrations::{keepalive, BridgeConnector, FileAuthStore};
use autoreply::llm::{create_gemini_client, LlmClient};
use autoreply::responder::{IntentClassifier, MessagePipeline, ReplyCatalog, ReplyDispatcher};
use autoreply::session::{ConnectionLifecycle, LifecycleOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    autoreply::observability::init();

    let cfg = load_config(None).context("Failed to load config")?;

    let shutdown = ShutdownManager::new();
    shutdown.install_signal_handlers();

    let keepalive = keepalive::spawn(cfg.server.port(), shutdown.token());

    let llm: Arc<dyn LlmClient> = Arc::new(create_gemini_client(
        cfg.llm.api_key.as_deref(),
        cfg.llm.base_url.as_deref(),
        Some(&cfg.llm.model),
    ));
    let pipeline = Arc::new(MessagePipeline::new(
        IntentClassifier::new(),
        ReplyDispatcher::new(llm, ReplyCatalog::default()),
        cfg.responder.cooldown(),
        cfg.responder.max_history,
    ));

    let mut lifecycle = ConnectionLifecycle::new(
        Arc::new(BridgeConnector::new(cfg.session.bridge_url.clone())),
        Arc::new(FileAuthStore::new(&cfg.session.auth_dir)),
        pipeline,
        cfg.session.reconnect_policy(),
        shutdown.token(),
    );

    match lifecycle.run().await {
        LifecycleOutcome::LoggedOut => tracing::warn!(
            auth_dir = %cfg.session.auth_dir.display(),
            "Message pipeline halted: credentials invalid. Remove the auth directory and restart to pair again."
        ),
        LifecycleOutcome::AttemptsExhausted => {
            tracing::warn!("Message pipeline halted: reconnect attempts exhausted")
        }
        LifecycleOutcome::Shutdown => {}
    }

    // 会话停机后进程继续提供保活端点，直到收到关闭信号
    shutdown.wait_for_shutdown().await;
    keepalive.await.context("Keep-alive task panicked")?;

    Ok(())
}
