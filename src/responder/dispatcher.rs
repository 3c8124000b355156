//! 回复分发
//!
//! 固定意图直接取预置文案；生成式意图组装请求（人设前言 + 风格后缀、历史、新消息），
//! 调用后端并在结果后追加联系方式。发送经由会话的 `MessageSender`，发送失败只记日志。

use std::sync::Arc;

use crate::llm::{LlmClient, LlmError};
use crate::memory::Message;
use crate::session::MessageSender;

use super::intent::{Intent, ResponseStyle};
use super::replies::ReplyCatalog;

pub struct ReplyDispatcher {
    llm: Arc<dyn LlmClient>,
    catalog: ReplyCatalog,
}

impl ReplyDispatcher {
    pub fn new(llm: Arc<dyn LlmClient>, catalog: ReplyCatalog) -> Self {
        Self { llm, catalog }
    }

    pub fn catalog(&self) -> &ReplyCatalog {
        &self.catalog
    }

    /// 固定意图的回复文案；生成式意图返回 None
    pub fn canned_reply(&self, intent: Intent) -> Option<&str> {
        match intent {
            Intent::Identity => Some(self.catalog.identity.as_str()),
            Intent::Greeting => Some(self.catalog.greeting.as_str()),
            Intent::HowAreYou => Some(self.catalog.how_are_you.as_str()),
            Intent::ImageRequest => Some(self.catalog.no_image.as_str()),
            Intent::Generative { .. } => None,
        }
    }

    /// 前言 + 风格后缀
    pub fn preamble(&self, style: ResponseStyle) -> String {
        let suffix = match style {
            ResponseStyle::Precise => &self.catalog.precise_suffix,
            ResponseStyle::Casual => &self.catalog.casual_suffix,
        };
        format!("{}{}", self.catalog.persona, suffix)
    }

    /// 按顺序组装：system 前言、历史、新的 user 消息
    pub fn build_request(&self, style: ResponseStyle, history: &[Message], text: &str) -> Vec<Message> {
        let mut request = Vec::with_capacity(history.len() + 2);
        request.push(Message::system(self.preamble(style)));
        request.extend_from_slice(history);
        request.push(Message::user(text));
        request
    }

    /// 调用后端，成功时返回追加了联系方式的完整回复
    pub async fn generate(
        &self,
        style: ResponseStyle,
        history: &[Message],
        text: &str,
    ) -> Result<String, LlmError> {
        let request = self.build_request(style, history, text);
        tracing::debug!(
            model = self.llm.model_name(),
            messages = request.len(),
            "requesting generative reply"
        );
        let core = self.llm.complete(&request).await?;
        Ok(format!("{}{}", core, self.catalog.contact_suffix))
    }

    /// 发送一条回复；返回是否发送成功
    pub async fn deliver(&self, sender: &dyn MessageSender, conversation_id: &str, text: &str) -> bool {
        match sender.send(conversation_id, text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(conversation = conversation_id, error = %e, "failed to send reply");
                false
            }
        }
    }
}
