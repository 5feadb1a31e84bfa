//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **MonotonicIdGenerator**: Clock のミリ秒 + 単調増加カウンタ（ULID）

use std::sync::Mutex;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use ulid::{Generator, Ulid};

use crate::domain::TaskId;
use crate::ports::Clock;

/// IdGenerator はタスク ID を生成
///
/// `Send + Sync` を要求（タイマータスクと intents の両方から使うため）
pub trait IdGenerator: Send + Sync {
    fn generate_task_id(&self) -> TaskId;
}

/// ULID ベースの単調増加 ID 生成器
///
/// 同じミリ秒内では ULID のランダム部をインクリメントするので、
/// 生成順 = ソート順 になります。タイムスタンプ部分はリロードを跨いだ衝突を防ぎます。
pub struct MonotonicIdGenerator<C> {
    clock: C,
    generator: Mutex<Generator>,
}

impl<C: Clock> MonotonicIdGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            generator: Mutex::new(Generator::new()),
        }
    }
}

impl<C: Clock> IdGenerator for MonotonicIdGenerator<C> {
    fn generate_task_id(&self) -> TaskId {
        let now = self.clock.now();
        let mut generator = self
            .generator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match generator.generate_from_datetime(SystemTime::from(now)) {
            Ok(ulid) => TaskId::from(ulid),
            Err(e) => {
                // カウンタ部が溢れた（同一ミリ秒で 2^80 回）: ランダム部で再生成
                tracing::warn!(error = %e, "monotonic id overflow, falling back to random ulid");
                let ulid = Ulid::from_parts(ulid_timestamp_ms(now), rand::random());
                TaskId::from(ulid)
            }
        }
    }
}

/// ULID のタイムスタンプ部は符号なし。エポック以前は 0 に丸める
fn ulid_timestamp_ms(now: DateTime<Utc>) -> u64 {
    u64::try_from(now.timestamp_millis()).unwrap_or(0)
}
