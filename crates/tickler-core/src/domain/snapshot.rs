//! Snapshot - 永続化レイアウト
//!
//! タスク一覧全体を 1 つの JSON ドキュメントとして保存します。
//! 表示用マークアップではなく、レコードの列を正本にします。

use serde::{Deserialize, Serialize};

use super::task::TaskRecord;

/// Current on-disk layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Whole-store persistent snapshot, ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            tasks: Vec::new(),
        }
    }
}

impl Snapshot {
    pub fn new(tasks: Vec<TaskRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            tasks,
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a stored blob.
    ///
    /// Malformed or unknown-version data is treated as "no data": the result
    /// is an empty snapshot and a warning, never an error.
    pub fn decode(blob: &str) -> Self {
        if blob.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Snapshot>(blob) {
            Ok(snapshot) if snapshot.version == SNAPSHOT_VERSION => snapshot,
            Ok(snapshot) => {
                tracing::warn!(
                    version = snapshot.version,
                    expected = SNAPSHOT_VERSION,
                    "unknown snapshot version, starting empty"
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "malformed snapshot, starting empty");
                Self::default()
            }
        }
    }
}
