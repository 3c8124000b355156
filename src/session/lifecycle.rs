//! 连接生命周期状态机
//!
//! connecting → open：会话报告已认证，记录本机地址。
//! connecting/open → closed：按状态码分类；Terminal 永久停机，Transient 固定延迟后重新建立会话。
//! 配对二维码只作为旁路输出打印；凭据变化原样转交给凭据存储。
//! `run` 返回前停止全部会话通道，返回后不会再有回复发出。

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::core::{ReconnectPolicy, RecoveryAction};
use crate::responder::{ConversationLanes, MessagePipeline};

use super::address::{extract_text, own_address, pairing_url};
use super::client::{AuthStateStore, Session, SessionConnector};
use super::disconnect::{DisconnectKind, DisconnectReason};
use super::event::{ConnectionState, ConnectionUpdate, SessionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Connecting,
    Open,
    Closed,
}

/// `run` 的结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// 凭据失效：删除凭据目录后重新扫码
    LoggedOut,
    /// 达到重连上限
    AttemptsExhausted,
    /// 收到关闭信号
    Shutdown,
}

pub struct ConnectionLifecycle {
    connector: Arc<dyn SessionConnector>,
    auth_store: Arc<dyn AuthStateStore>,
    lanes: ConversationLanes,
    policy: ReconnectPolicy,
    shutdown: CancellationToken,
    state_tx: watch::Sender<LifecycleState>,
    own_address: Option<String>,
    /// 上次成功打开之后连续重连的次数
    attempts: u32,
}

impl ConnectionLifecycle {
    pub fn new(
        connector: Arc<dyn SessionConnector>,
        auth_store: Arc<dyn AuthStateStore>,
        pipeline: Arc<MessagePipeline>,
        policy: ReconnectPolicy,
        shutdown: CancellationToken,
    ) -> Self {
        let (state_tx, _) = watch::channel(LifecycleState::Connecting);
        Self {
            connector,
            auth_store,
            lanes: ConversationLanes::new(pipeline),
            policy,
            shutdown,
            state_tx,
            own_address: None,
            attempts: 0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> LifecycleState {
        *self.state_tx.borrow()
    }

    pub fn own_address(&self) -> Option<&str> {
        self.own_address.as_deref()
    }

    fn set_state(&self, state: LifecycleState) {
        self.state_tx.send_replace(state);
    }

    /// 建立会话并驱动事件，直到停机或收到关闭信号
    pub async fn run(&mut self) -> LifecycleOutcome {
        loop {
            self.set_state(LifecycleState::Connecting);

            let reason = match self.establish().await {
                Ok(session) => match self.drive(session).await {
                    Some(reason) => reason,
                    None => return self.stop(),
                },
                Err(e) => {
                    tracing::warn!(error = %e, "session establishment failed");
                    DisconnectReason::Unknown
                }
            };
            self.set_state(LifecycleState::Closed);

            match self.policy.decide(reason, self.attempts) {
                RecoveryAction::Halt if reason.kind() == DisconnectKind::Terminal => {
                    tracing::error!(
                        "Session invalid ({}). Delete the auth directory and scan the QR again.",
                        reason
                    );
                    return self.finish(LifecycleOutcome::LoggedOut);
                }
                RecoveryAction::Halt => {
                    tracing::error!(attempts = self.attempts, "reconnect attempts exhausted");
                    return self.finish(LifecycleOutcome::AttemptsExhausted);
                }
                RecoveryAction::Reconnect { after } => {
                    self.attempts += 1;
                    tracing::info!(
                        attempt = self.attempts,
                        "reconnecting in {}s",
                        after.as_secs_f32()
                    );
                    let cancelled = tokio::select! {
                        _ = tokio::time::sleep(after) => false,
                        _ = self.shutdown.cancelled() => true,
                    };
                    if cancelled {
                        return self.stop();
                    }
                }
            }
        }
    }

    fn stop(&mut self) -> LifecycleOutcome {
        self.set_state(LifecycleState::Closed);
        self.finish(LifecycleOutcome::Shutdown)
    }

    /// 停机：会话已不可用，排队中的消息不再处理
    fn finish(&mut self, outcome: LifecycleOutcome) -> LifecycleOutcome {
        let stopped = self.lanes.abort_all();
        if stopped > 0 {
            tracing::info!(lanes = stopped, ?outcome, "stopped conversation lanes");
        }
        outcome
    }

    async fn establish(&self) -> Result<Session, crate::core::SessionError> {
        let creds = match self.auth_store.load().await {
            Ok(creds) => creds,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load credentials, pairing from scratch");
                None
            }
        };
        if creds.is_none() {
            tracing::info!("no stored credentials, waiting for QR pairing");
        }
        self.connector.connect(creds).await
    }

    /// 消费事件直到会话关闭；收到关闭信号时返回 None
    async fn drive(&mut self, mut session: Session) -> Option<DisconnectReason> {
        loop {
            let event = tokio::select! {
                _ = self.shutdown.cancelled() => return None,
                event = session.events.recv() => event,
            };

            let Some(event) = event else {
                tracing::warn!("session event stream ended without close update");
                return Some(DisconnectReason::Unknown);
            };

            match event {
                SessionEvent::ConnectionUpdate(update) => {
                    if let Some(reason) = self.on_connection_update(update) {
                        return Some(reason);
                    }
                }
                SessionEvent::MessagesUpsert { messages } => {
                    let Some(first) = messages.first() else { continue };
                    if let Some((conversation_id, text)) = extract_text(first) {
                        self.lanes.dispatch(
                            conversation_id,
                            text.to_string(),
                            Arc::clone(&session.sender),
                        );
                    }
                }
                SessionEvent::CredsUpdate { creds } => {
                    if let Err(e) = self.auth_store.save(&creds).await {
                        tracing::error!(error = %e, "failed to persist credentials");
                    }
                }
            }
        }
    }

    fn on_connection_update(&mut self, update: ConnectionUpdate) -> Option<DisconnectReason> {
        if let Some(connection) = update.connection {
            tracing::info!(?connection, "connection update");
        }

        if let Some(qr) = update.qr.as_deref() {
            tracing::info!("Scan this QR to pair: {}", pairing_url(qr));
        }

        match update.connection {
            Some(ConnectionState::Open) => {
                if let Some(user_id) = update.user_id.as_deref() {
                    let address = own_address(user_id);
                    tracing::info!(address = %address, "bot connected");
                    self.own_address = Some(address);
                }
                self.attempts = 0;
                self.set_state(LifecycleState::Open);
                None
            }
            Some(ConnectionState::Close) => {
                let reason = DisconnectReason::from_status(update.status_code);
                tracing::warn!(
                    reason = %reason,
                    error = update.error.as_deref().unwrap_or("-"),
                    "disconnected"
                );
                Some(reason)
            }
            Some(ConnectionState::Connecting) | None => None,
        }
    }
}
