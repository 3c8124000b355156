//! 按会话的对话历史存储
//!
//! 会话 ID -> ConversationMemory，首次访问时惰性创建，进程存活期间不删除。
//! 只有生成式回复路径会读写这里。

use std::collections::HashMap;

use super::{ConversationMemory, Message};

/// 每个会话最多保留的消息条数（5 次问答）
pub const MAX_HISTORY_LENGTH: usize = 10;

#[derive(Debug)]
pub struct HistoryStore {
    conversations: HashMap<String, ConversationMemory>,
    max_messages: usize,
}

impl HistoryStore {
    pub fn new(max_messages: usize) -> Self {
        Self {
            conversations: HashMap::new(),
            max_messages,
        }
    }

    fn entry(&mut self, conversation_id: &str) -> &mut ConversationMemory {
        let max = self.max_messages;
        self.conversations
            .entry(conversation_id.to_string())
            .or_insert_with(|| ConversationMemory::new(max))
    }

    /// 追加单条消息（不剪枝）
    pub fn append(&mut self, conversation_id: &str, message: Message) {
        self.entry(conversation_id).push(message);
    }

    /// 当前历史的有序快照
    pub fn get(&mut self, conversation_id: &str) -> Vec<Message> {
        self.entry(conversation_id).messages().to_vec()
    }

    /// 记录一次成功的生成式交换，然后截断到最近 `max_messages` 条
    pub fn record_exchange(&mut self, conversation_id: &str, user: Message, assistant: Message) {
        self.entry(conversation_id).push_exchange(user, assistant);
    }

    pub fn len(&self, conversation_id: &str) -> usize {
        self.conversations
            .get(conversation_id)
            .map(ConversationMemory::len)
            .unwrap_or(0)
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(MAX_HISTORY_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_creates_empty_history() {
        let mut store = HistoryStore::default();
        assert!(store.get("521@s.whatsapp.net").is_empty());
        assert_eq!(store.len("521@s.whatsapp.net"), 0);
    }

    #[test]
    fn test_histories_are_isolated() {
        let mut store = HistoryStore::default();
        store.record_exchange("a", Message::user("hola"), Message::assistant("qué tal"));
        assert_eq!(store.len("a"), 2);
        assert_eq!(store.len("b"), 0);
    }

    #[test]
    fn test_six_exchanges_keep_last_five() {
        let mut store = HistoryStore::default();
        for i in 0..6 {
            store.record_exchange(
                "a",
                Message::user(format!("q{i}")),
                Message::assistant(format!("r{i}")),
            );
            assert!(store.len("a") <= MAX_HISTORY_LENGTH);
        }
        let history = store.get("a");
        assert_eq!(history.len(), 10);
        assert_eq!(history[0], Message::user("q1"));
        assert_eq!(history[9], Message::assistant("r5"));
    }

    #[test]
    fn test_append_keeps_order() {
        let mut store = HistoryStore::new(4);
        store.append("a", Message::user("uno"));
        store.append("a", Message::assistant("dos"));
        let history = store.get("a");
        assert_eq!(history[0].content, "uno");
        assert_eq!(history[1].content, "dos");
    }
}
