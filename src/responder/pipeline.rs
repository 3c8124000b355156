//! 消息处理流水线
//!
//! 冷却闸门 → 意图分类 →（固定回复 | 历史 + 生成式调用）→ 发送。
//! 冷却表与历史表归同一个流水线实例所有；锁只在同步片段内持有，不跨 await。

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::memory::{HistoryStore, Message};
use crate::session::MessageSender;

use super::cooldown::CooldownGate;
use super::dispatcher::ReplyDispatcher;
use super::intent::{Intent, IntentClassifier};

/// 单条消息的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// 空文本，未处理
    Ignored,
    /// 仍在冷却期内，未回复
    CoolingDown,
    /// 发送了固定回复
    Canned(Intent),
    /// 发送了生成式回复
    Generated,
    /// 后端失败，发送了错误提示
    BackendFailed,
    /// 回复未能发出
    SendFailed,
}

#[derive(Debug)]
struct ConversationState {
    cooldowns: CooldownGate,
    histories: HistoryStore,
}

pub struct MessagePipeline {
    classifier: IntentClassifier,
    dispatcher: ReplyDispatcher,
    state: Mutex<ConversationState>,
}

impl MessagePipeline {
    pub fn new(
        classifier: IntentClassifier,
        dispatcher: ReplyDispatcher,
        cooldown: Duration,
        max_history: usize,
    ) -> Self {
        Self {
            classifier,
            dispatcher,
            state: Mutex::new(ConversationState {
                cooldowns: CooldownGate::new(cooldown),
                histories: HistoryStore::new(max_history),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn history(&self, conversation_id: &str) -> Vec<Message> {
        self.state().histories.get(conversation_id)
    }

    pub fn cooldown_expiry(&self, conversation_id: &str) -> Option<Instant> {
        self.state().cooldowns.expiry(conversation_id)
    }

    fn arm_cooldown(&self, conversation_id: &str) {
        self.state().cooldowns.arm(conversation_id, Instant::now());
    }

    /// 处理一条已过滤的一对一文本消息
    pub async fn handle(
        &self,
        sender: &dyn MessageSender,
        conversation_id: &str,
        raw_text: &str,
    ) -> HandleOutcome {
        if !self.state().cooldowns.allow(conversation_id, Instant::now()) {
            tracing::debug!(conversation = conversation_id, "cooldown active, skipping");
            return HandleOutcome::CoolingDown;
        }

        let Some(classification) = self.classifier.classify(raw_text) else {
            return HandleOutcome::Ignored;
        };
        tracing::info!(
            conversation = conversation_id,
            intent = ?classification.intent,
            "inbound message: {}",
            classification.text
        );

        let style = match classification.intent {
            Intent::Generative { style } => style,
            intent => {
                let reply = self.dispatcher.canned_reply(intent).unwrap_or_default().to_string();
                if !self.dispatcher.deliver(sender, conversation_id, &reply).await {
                    return HandleOutcome::SendFailed;
                }
                self.arm_cooldown(conversation_id);
                return HandleOutcome::Canned(intent);
            }
        };

        let history = self.history(conversation_id);
        match self
            .dispatcher
            .generate(style, &history, &classification.text)
            .await
        {
            Ok(reply) => {
                self.state().histories.record_exchange(
                    conversation_id,
                    Message::user(classification.text.clone()),
                    Message::assistant(reply.clone()),
                );
                if !self.dispatcher.deliver(sender, conversation_id, &reply).await {
                    return HandleOutcome::SendFailed;
                }
                self.arm_cooldown(conversation_id);
                HandleOutcome::Generated
            }
            Err(e) => {
                tracing::error!(conversation = conversation_id, error = %e, "generative backend failed");
                let fallback = self.dispatcher.catalog().error.clone();
                if !self.dispatcher.deliver(sender, conversation_id, &fallback).await {
                    return HandleOutcome::SendFailed;
                }
                self.arm_cooldown(conversation_id);
                HandleOutcome::BackendFailed
            }
        }
    }
}
