//! Errors - エラー型
//!
//! - **ActionError**: Action の関数が返す失敗。呼び出し元へそのまま伝播する
//! - **TropismError**: Decider / 設定 / スケジューラまわりの失敗

use thiserror::Error;

/// Failure reported by an action's function.
///
/// When an action fails no instance is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ActionError {
    message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
pub enum TropismError {
    #[error("action not found: name={0}")]
    UnknownAction(String),

    #[error("duplicate action: name={0}")]
    DuplicateAction(String),

    #[error("Missing actions: {0:?}. These actions were expected but not registered.")]
    MissingActions(Vec<String>),

    #[error("invalid trend value: {0} (expected -1, 0 or 1)")]
    InvalidTrend(i8),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse failed: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("config read failed: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error(transparent)]
    Action(#[from] ActionError),
}
