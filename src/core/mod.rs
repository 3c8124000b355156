//! 核心层：错误类型、断线恢复策略、优雅关闭

pub mod error;
pub mod recovery;
pub mod shutdown;

pub use error::{ResponderError, SessionError};
pub use recovery::{ReconnectPolicy, RecoveryAction};
pub use shutdown::{ShutdownManager, ShutdownReason};
