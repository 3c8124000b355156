//! 按会话的冷却闸门
//!
//! 会话 ID -> 到期时间。到期前的一切消息都不回复；每次成功发出回复（包括错误提示）都会重新计时。
//! 过期条目不清理，下次回复时直接覆盖。

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// 默认冷却窗口
pub const COOLDOWN_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct CooldownGate {
    window: Duration,
    expiries: HashMap<String, Instant>,
}

impl CooldownGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            expiries: HashMap::new(),
        }
    }

    /// 无条目或到期时间 <= now 时放行
    pub fn allow(&self, conversation_id: &str, now: Instant) -> bool {
        match self.expiries.get(conversation_id) {
            Some(expiry) => *expiry <= now,
            None => true,
        }
    }

    /// 设置到期时间为 now + window，返回到期时间
    pub fn arm(&mut self, conversation_id: &str, now: Instant) -> Instant {
        let expiry = now + self.window;
        self.expiries.insert(conversation_id.to_string(), expiry);
        expiry
    }

    pub fn expiry(&self, conversation_id: &str) -> Option<Instant> {
        self.expiries.get(conversation_id).copied()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::new(COOLDOWN_WINDOW)
    }
}
