//! LocalStorage port - ブラウザの localStorage 相当
//!
//! 文字列 key → 文字列 value の単純な KV ストアです。
//! Snapshot 全体を 1 つの key に上書き保存します（last-writer-wins）。
//!
//! # 実装
//! - InMemoryStorage（テスト・デモ用）
//! - FileStorage（key ごとに 1 ファイル）

use crate::domain::StorageError;

pub trait LocalStorage: Send + Sync {
    /// `Ok(None)` when the key has never been written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
