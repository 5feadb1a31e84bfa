//! In-memory ordered task list.

use chrono::{DateTime, Utc};

use crate::domain::{Snapshot, TaskId, TaskRecord};

/// Ordered collection of tasks, newest first.
///
/// Design:
/// - Single source of truth for task state while the app runs.
/// - State transitions go through methods, never direct field access from
///   outside the store.
/// - Expected sizes are small, so lookups are linear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<TaskRecord>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut store = Self::new();
        for task in snapshot.tasks {
            // 重複 ID は最初の 1 件だけ残す（壊れた snapshot 対策）
            if store.contains(task.id) {
                tracing::warn!(task_id = %task.id, "duplicate task id in snapshot, dropping");
                continue;
            }
            store.tasks.push(task);
        }
        store
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::new(self.tasks.clone())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskRecord> {
        self.tasks.iter()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: TaskId) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut TaskRecord> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// New tasks go to the top of the list.
    pub fn insert_front(&mut self, task: TaskRecord) {
        self.tasks.insert(0, task);
    }

    pub fn remove(&mut self, id: TaskId) -> Option<TaskRecord> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    /// Returns the new completion flag, or `None` if the task is gone.
    pub fn toggle(&mut self, id: TaskId) -> Option<bool> {
        self.get_mut(id).map(TaskRecord::toggle)
    }

    /// `true` only if a pending reminder was actually cleared.
    pub fn clear_reminder(&mut self, id: TaskId) -> bool {
        self.get_mut(id).is_some_and(TaskRecord::clear_reminder)
    }

    /// Replace the reminder. Returns `false` if the task is gone.
    pub fn set_reminder(&mut self, id: TaskId, reminder_at: Option<DateTime<Utc>>) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.reminder_at = reminder_at;
                true
            }
            None => false,
        }
    }

    /// Every task that still has a reminder to fire, in list order.
    pub fn pending_reminders(&self) -> Vec<(TaskId, DateTime<Utc>)> {
        self.tasks
            .iter()
            .filter_map(|t| t.reminder_at.map(|at| (t.id, at)))
            .collect()
    }
}
