//! 断线恢复策略
//!
//! 根据断线原因（Terminal / Transient）与已重连次数给出动作：固定间隔重连或停机。

use std::time::Duration;

use crate::session::{DisconnectKind, DisconnectReason};

/// 默认重连间隔
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// 恢复引擎给出的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// 等待后重新建立会话
    Reconnect { after: Duration },
    /// 不再重连，需要运维介入（清除凭据后重新扫码）
    Halt,
}

/// 固定退避的重连策略；`max_attempts = None` 表示无限重连
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    pub delay: Duration,
    pub max_attempts: Option<u32>,
}

impl ReconnectPolicy {
    pub fn new(delay: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            delay,
            max_attempts,
        }
    }

    /// `attempts` 为本次断线之前已连续重连的次数
    pub fn decide(&self, reason: DisconnectReason, attempts: u32) -> RecoveryAction {
        match reason.kind() {
            DisconnectKind::Terminal => RecoveryAction::Halt,
            DisconnectKind::Transient => match self.max_attempts {
                Some(max) if attempts >= max => RecoveryAction::Halt,
                _ => RecoveryAction::Reconnect { after: self.delay },
            },
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_DELAY, None)
    }
}
