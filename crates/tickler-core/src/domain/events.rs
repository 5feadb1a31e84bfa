//! Events - ドメインイベント
//!
//! 表示層（external）はこのイベントを受けて再描画します。
//! EventSink port 経由で送信されます。

use chrono::{DateTime, Utc};

use super::ids::TaskId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    TaskAdded {
        task_id: TaskId,
    },
    TaskDeleted {
        task_id: TaskId,
    },
    TaskToggled {
        task_id: TaskId,
        completed: bool,
    },
    ReminderScheduled {
        task_id: TaskId,
        fire_at: DateTime<Utc>,
    },
    ReminderCancelled {
        task_id: TaskId,
    },
    /// Cosmetic: the task should be highlighted as "ringing".
    ReminderActivated {
        task_id: TaskId,
    },
    /// The reminder fired and its timestamp was cleared.
    ReminderConsumed {
        task_id: TaskId,
    },
    SnapshotRestored {
        tasks: usize,
        pending_reminders: usize,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::TaskAdded { .. } => "task_added",
            DomainEvent::TaskDeleted { .. } => "task_deleted",
            DomainEvent::TaskToggled { .. } => "task_toggled",
            DomainEvent::ReminderScheduled { .. } => "reminder_scheduled",
            DomainEvent::ReminderCancelled { .. } => "reminder_cancelled",
            DomainEvent::ReminderActivated { .. } => "reminder_activated",
            DomainEvent::ReminderConsumed { .. } => "reminder_consumed",
            DomainEvent::SnapshotRestored { .. } => "snapshot_restored",
        }
    }

    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            DomainEvent::TaskAdded { task_id }
            | DomainEvent::TaskDeleted { task_id }
            | DomainEvent::TaskToggled { task_id, .. }
            | DomainEvent::ReminderScheduled { task_id, .. }
            | DomainEvent::ReminderCancelled { task_id }
            | DomainEvent::ReminderActivated { task_id }
            | DomainEvent::ReminderConsumed { task_id } => Some(*task_id),
            DomainEvent::SnapshotRestored { .. } => None,
        }
    }
}
