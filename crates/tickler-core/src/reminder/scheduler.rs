//! ReminderScheduler - task ID ごとの単発タイマー表
//!
//! # 不変条件
//! - 1 つの task ID につき生きているタイマーは高々 1 つ
//! - 再スケジュールは必ず cancel → arm の順
//! - cancel されたタイマーは handler を呼ばない
//!
//! キャンセルは `JoinHandle::abort` に加えて世代番号（generation）で守ります。
//! 発火したタスクは表のロックを取り、自分の世代がまだ登録されている場合だけ
//! エントリを外して handler を呼びます。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::domain::TaskId;
use crate::ports::Clock;

/// Called when a reminder's timer elapses.
///
/// `fire_at` is the time the timer was armed for. The handler must ignore
/// the call when the task's reminder has since been replaced.
#[async_trait]
pub trait ReminderHandler: Send + Sync {
    async fn on_fire(&self, task_id: TaskId, fire_at: DateTime<Utc>);
}

/// One armed single-shot timer.
#[derive(Debug)]
struct Armed {
    fire_at: DateTime<Utc>,
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug, Default)]
struct TimerTable {
    armed: HashMap<TaskId, Armed>,
    next_generation: u64,
}

impl TimerTable {
    fn disarm(&mut self, task_id: TaskId) -> bool {
        match self.armed.remove(&task_id) {
            Some(prev) => {
                prev.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Remove the entry only if it is still the given generation.
    fn take_if_current(&mut self, task_id: TaskId, generation: u64) -> bool {
        match self.armed.get(&task_id) {
            Some(armed) if armed.generation == generation => {
                self.armed.remove(&task_id);
                true
            }
            _ => false,
        }
    }
}

pub struct ReminderScheduler<C> {
    clock: C,
    handler: Arc<dyn ReminderHandler>,
    immediate_threshold: Duration,
    grace_delay: Duration,
    table: Arc<Mutex<TimerTable>>,
}

impl<C: Clock> ReminderScheduler<C> {
    pub fn new(
        clock: C,
        handler: Arc<dyn ReminderHandler>,
        immediate_threshold: Duration,
        grace_delay: Duration,
    ) -> Self {
        Self {
            clock,
            handler,
            immediate_threshold,
            grace_delay,
            table: Arc::new(Mutex::new(TimerTable::default())),
        }
    }

    /// How long to wait before firing a reminder due at `fire_at`.
    ///
    /// Anything due within the immediate threshold (past times included)
    /// waits only the grace delay, so the caller finishes its current unit
    /// of work first.
    pub fn delay_until(&self, fire_at: DateTime<Utc>) -> Duration {
        let remaining = fire_at - self.clock.now();
        match remaining.to_std() {
            Ok(d) if d > self.immediate_threshold => d,
            // 負の値（過去）は to_std が Err を返す
            _ => self.grace_delay,
        }
    }

    /// Arm (or re-arm) the reminder for `task_id`.
    pub async fn schedule(&self, task_id: TaskId, fire_at: DateTime<Utc>) {
        let delay = self.delay_until(fire_at);
        let mut table = self.table.lock().await;

        if table.disarm(task_id) {
            tracing::debug!(task_id = %task_id, "replaced existing reminder timer");
        }

        let generation = table.next_generation;
        table.next_generation += 1;
        let deadline = Instant::now() + delay;

        // 表のロックを握ったまま spawn するので、タイマー側が先に表を見ることはない
        let handle = tokio::spawn(fire_at_deadline(
            deadline,
            task_id,
            fire_at,
            generation,
            Arc::clone(&self.table),
            Arc::clone(&self.handler),
        ));
        table.armed.insert(
            task_id,
            Armed {
                fire_at,
                generation,
                handle,
            },
        );

        tracing::debug!(
            task_id = %task_id,
            %fire_at,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "reminder armed"
        );
    }

    /// Cancel the live timer for `task_id`, if any. Returns whether one existed.
    pub async fn cancel(&self, task_id: TaskId) -> bool {
        let cancelled = self.table.lock().await.disarm(task_id);
        if cancelled {
            tracing::debug!(task_id = %task_id, "reminder cancelled");
        }
        cancelled
    }

    pub async fn cancel_all(&self) -> usize {
        let mut table = self.table.lock().await;
        let ids: Vec<TaskId> = table.armed.keys().copied().collect();
        for id in &ids {
            table.disarm(*id);
        }
        ids.len()
    }

    /// Fire time of the live timer for `task_id`.
    pub async fn pending(&self, task_id: TaskId) -> Option<DateTime<Utc>> {
        self.table
            .lock()
            .await
            .armed
            .get(&task_id)
            .map(|a| a.fire_at)
    }

    /// Number of live timers.
    pub async fn len(&self) -> usize {
        self.table.lock().await.armed.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

async fn fire_at_deadline(
    deadline: Instant,
    task_id: TaskId,
    fire_at: DateTime<Utc>,
    generation: u64,
    table: Arc<Mutex<TimerTable>>,
    handler: Arc<dyn ReminderHandler>,
) {
    tokio::time::sleep_until(deadline).await;

    if !table.lock().await.take_if_current(task_id, generation) {
        tracing::debug!(task_id = %task_id, generation, "stale reminder timer ignored");
        return;
    }

    // ここで表のロックは解放済み。差し替え済みかどうかは handler がストアで判定する
    handler.on_fire(task_id, fire_at).await;
}
