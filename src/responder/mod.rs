//! 消息处理：意图分类、冷却闸门、回复分发、流水线与按会话的处理通道

pub mod cooldown;
pub mod dispatcher;
pub mod intent;
pub mod lanes;
pub mod pipeline;
pub mod replies;

pub use cooldown::{CooldownGate, COOLDOWN_WINDOW};
pub use dispatcher::ReplyDispatcher;
pub use intent::{Classification, Intent, IntentClassifier, MatchMode, ResponseStyle};
pub use lanes::{ConversationLanes, LANE_IDLE_TIMEOUT};
pub use pipeline::{HandleOutcome, MessagePipeline};
pub use replies::ReplyCatalog;
