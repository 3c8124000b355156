//! 记忆层：消息模型（角色 + 文本）与按会话的有界对话历史

pub mod conversation;
pub mod history;

pub use conversation::{ConversationMemory, Message, Role};
pub use history::{HistoryStore, MAX_HISTORY_LENGTH};
