//! Errors - エラー型と分類
//!
//! intents（add/delete/toggle）で呼び出し元に返すエラーだけをここに置きます。
//! リマインダー発火経路のエラー（音声・通知）は ports 側の型で表現し、
//! trigger 内で握りつぶしてログに落とします。

use thiserror::Error;

use super::ids::TaskId;

/// StorageError は LocalStorage 実装の失敗
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error for key={key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// TicklerError はドメインエラー
#[derive(Debug, Error)]
pub enum TicklerError {
    /// User-input error: blocks the add, nothing is mutated.
    #[error("task text must not be empty")]
    EmptyTaskText,

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("invalid task id: {0:?}")]
    InvalidTaskId(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
