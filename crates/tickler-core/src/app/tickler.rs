//! Tickler - UI intents の受け口
//!
//! 表示層（external）からの add / delete / toggle をストアの変更と
//! スケジューラ呼び出しに変換します。各 intent はストアのロックを握ったまま
//! 完了するので、タイマー発火と途中で混ざることはありません。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{DomainEvent, TaskId, TaskRecord, TaskText, TicklerError};
use crate::ports::{Clock, EventSink, IdGenerator};
use crate::reminder::{FireOutcome, ReminderScheduler, ReminderTrigger};
use crate::store::{SnapshotRepository, TaskStore};

pub struct Tickler {
    pub(super) store: Arc<Mutex<TaskStore>>,
    pub(super) repo: SnapshotRepository,
    pub(super) scheduler: ReminderScheduler<Arc<dyn Clock>>,
    pub(super) trigger: Arc<ReminderTrigger>,
    pub(super) ids: Arc<dyn IdGenerator>,
    pub(super) events: Arc<dyn EventSink>,
}

impl Tickler {
    /// Add a task at the top of the list, optionally with a reminder.
    ///
    /// Blank text is rejected before anything is touched. A storage failure
    /// is returned, but the task stays in memory and its reminder stays armed.
    pub async fn add_task(
        &self,
        text: &str,
        reminder_at: Option<DateTime<Utc>>,
    ) -> Result<TaskId, TicklerError> {
        let text = TaskText::new(text)?;
        let id = self.ids.generate_task_id();

        let mut store = self.store.lock().await;
        store.insert_front(TaskRecord::new(id, text, reminder_at));
        self.events.emit(&DomainEvent::TaskAdded { task_id: id });

        if let Some(fire_at) = reminder_at {
            self.scheduler.schedule(id, fire_at).await;
            self.events
                .emit(&DomainEvent::ReminderScheduled { task_id: id, fire_at });
        }

        self.repo.save(&store)?;
        tracing::info!(task_id = %id, reminder = ?reminder_at, "task added");
        Ok(id)
    }

    /// Remove a task and cancel its reminder.
    ///
    /// Once this returns, no reminder fires for `id`, even if its timer had
    /// already elapsed and was waiting on the store.
    pub async fn delete_task(&self, id: TaskId) -> Result<TaskRecord, TicklerError> {
        let mut store = self.store.lock().await;
        let removed = store.remove(id).ok_or(TicklerError::TaskNotFound(id))?;

        if self.scheduler.cancel(id).await {
            self.events
                .emit(&DomainEvent::ReminderCancelled { task_id: id });
        }
        self.events.emit(&DomainEvent::TaskDeleted { task_id: id });

        self.repo.save(&store)?;
        tracing::info!(task_id = %id, "task deleted");
        Ok(removed)
    }

    /// Flip the completion flag. Returns the new value.
    pub async fn toggle_complete(&self, id: TaskId) -> Result<bool, TicklerError> {
        let mut store = self.store.lock().await;
        let completed = store.toggle(id).ok_or(TicklerError::TaskNotFound(id))?;
        self.events.emit(&DomainEvent::TaskToggled {
            task_id: id,
            completed,
        });

        self.repo.save(&store)?;
        Ok(completed)
    }

    /// Replace (or with `None`, remove) a task's reminder.
    ///
    /// The old timer is cancelled before a new one is armed.
    pub async fn set_reminder(
        &self,
        id: TaskId,
        reminder_at: Option<DateTime<Utc>>,
    ) -> Result<(), TicklerError> {
        let mut store = self.store.lock().await;
        if !store.set_reminder(id, reminder_at) {
            return Err(TicklerError::TaskNotFound(id));
        }

        match reminder_at {
            Some(fire_at) => {
                self.scheduler.schedule(id, fire_at).await;
                self.events
                    .emit(&DomainEvent::ReminderScheduled { task_id: id, fire_at });
            }
            None => {
                if self.scheduler.cancel(id).await {
                    self.events
                        .emit(&DomainEvent::ReminderCancelled { task_id: id });
                }
            }
        }

        self.repo.save(&store)?;
        Ok(())
    }

    /// Run a task's reminder right now, bypassing its timer.
    pub async fn fire_reminder(&self, id: TaskId) -> FireOutcome {
        self.scheduler.cancel(id).await;
        self.trigger.fire(id).await
    }

    /// All tasks, newest first.
    pub async fn tasks(&self) -> Vec<TaskRecord> {
        self.store.lock().await.iter().cloned().collect()
    }

    pub async fn task(&self, id: TaskId) -> Option<TaskRecord> {
        self.store.lock().await.get(id).cloned()
    }

    /// Fire time of the live timer for `id`, if one is armed.
    pub async fn scheduled_at(&self, id: TaskId) -> Option<DateTime<Utc>> {
        self.scheduler.pending(id).await
    }

    /// Number of live reminder timers.
    pub async fn armed_reminders(&self) -> usize {
        self.scheduler.len().await
    }

    /// Stop all timers. Tasks and their reminder timestamps are kept, so the
    /// next `open` re-arms them.
    pub async fn shutdown(&self) {
        let cancelled = self.scheduler.cancel_all().await;
        tracing::info!(cancelled, "tickler shut down");
    }
}
