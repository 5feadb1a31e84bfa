//! ReminderTrigger - タイマー発火時の処理
//!
//! # フロー（1 回の発火 = ストアのロックを握ったままの 1 単位）
//! 1. タスクがまだ存在し、リマインダーが未消費か確認（違えば何もしない）
//! 2. ReminderActivated イベント（見た目のハイライト）
//! 3. アラーム音（失敗してもログだけ）
//! 4. メッセージをプールからランダムに選ぶ
//! 5. 通知 or モーダルで配送（許可状態による）
//! 6. reminder_at をクリア
//! 7. スナップショットを保存
//!
//! どのステップの失敗も後続ステップを止めません。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::domain::{DomainEvent, MessagePool, TaskId};
use crate::ports::{AlarmSound, EventSink, ModalPresenter, Notice, NotificationCenter, Permission};
use crate::store::{SnapshotRepository, TaskStore};

use super::scheduler::ReminderHandler;
use super::tone::ToneSequence;

/// Which visible channel carried the reminder.
#[derive(Debug)]
pub enum Delivery {
    Notification,
    Modal,
    /// Permission was undecided; the request is in flight and the handle
    /// resolves to the channel finally used.
    AwaitingPermission(JoinHandle<Delivery>),
}

#[derive(Debug)]
pub enum FireOutcome {
    /// The task was deleted before the timer got to it.
    Missing,
    /// The reminder was already consumed; nothing was done.
    AlreadyConsumed,
    /// The timer was armed for a reminder that has since been replaced.
    Superseded,
    Fired(Delivery),
}

impl FireOutcome {
    pub fn fired(&self) -> bool {
        matches!(self, FireOutcome::Fired(_))
    }
}

/// Delivers one message through exactly one visible channel.
#[derive(Clone)]
struct Courier {
    notifications: Arc<dyn NotificationCenter>,
    modal: Arc<dyn ModalPresenter>,
    title: String,
    dismiss_after: Duration,
}

impl Courier {
    fn deliver(&self, message: String, task_text: String) -> Delivery {
        match self.notifications.permission() {
            Permission::Granted => self.notify_or_modal(&message, &task_text),
            Permission::Undecided => {
                let courier = self.clone();
                Delivery::AwaitingPermission(tokio::spawn(async move {
                    courier.deliver_after_request(message, task_text).await
                }))
            }
            Permission::Denied | Permission::Unsupported => {
                self.modal(&message, &task_text);
                Delivery::Modal
            }
        }
    }

    /// On grant only the delivery is re-run, as a notification. Any other
    /// answer falls back to the modal so the reminder is never lost.
    async fn deliver_after_request(self, message: String, task_text: String) -> Delivery {
        match self.notifications.request_permission().await {
            Permission::Granted => self.notify_or_modal(&message, &task_text),
            other => {
                tracing::debug!(permission = ?other, "notification permission not granted");
                self.modal(&message, &task_text);
                Delivery::Modal
            }
        }
    }

    fn notify_or_modal(&self, message: &str, task_text: &str) -> Delivery {
        let notice = Notice {
            title: self.title.clone(),
            body: format!("{message}\n{task_text}"),
            silent: true,
        };
        match self.notifications.show(&notice) {
            Ok(id) => {
                let notifications = Arc::clone(&self.notifications);
                let dismiss_at = Instant::now() + self.dismiss_after;
                tokio::spawn(async move {
                    tokio::time::sleep_until(dismiss_at).await;
                    notifications.close(id);
                });
                Delivery::Notification
            }
            Err(e) => {
                tracing::warn!(error = %e, "notification failed, falling back to modal");
                self.modal(message, task_text);
                Delivery::Modal
            }
        }
    }

    fn modal(&self, message: &str, task_text: &str) {
        self.modal.show_modal(&format!("{message}\n{task_text}"));
    }
}

pub struct ReminderTrigger {
    store: Arc<Mutex<TaskStore>>,
    repo: SnapshotRepository,
    alarm: Arc<dyn AlarmSound>,
    events: Arc<dyn EventSink>,
    messages: MessagePool,
    tones: ToneSequence,
    courier: Courier,
}

impl ReminderTrigger {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<Mutex<TaskStore>>,
        repo: SnapshotRepository,
        notifications: Arc<dyn NotificationCenter>,
        alarm: Arc<dyn AlarmSound>,
        modal: Arc<dyn ModalPresenter>,
        events: Arc<dyn EventSink>,
        messages: MessagePool,
        title: impl Into<String>,
        dismiss_after: Duration,
    ) -> Self {
        Self {
            store,
            repo,
            alarm,
            events,
            messages,
            tones: ToneSequence::alarm(),
            courier: Courier {
                notifications,
                modal,
                title: title.into(),
                dismiss_after,
            },
        }
    }

    /// Run the reminder for `task_id`, whatever time it is set for.
    ///
    /// Safe to call for a task that was deleted or already fired: both are
    /// no-ops that touch neither state nor storage.
    pub async fn fire(&self, task_id: TaskId) -> FireOutcome {
        self.run(task_id, None).await
    }

    /// Run the reminder for `task_id` only if it is still set for `fire_at`.
    ///
    /// A timer that elapsed while its reminder was being replaced gets
    /// [`FireOutcome::Superseded`] and leaves the new reminder alone.
    pub async fn fire_due(&self, task_id: TaskId, fire_at: DateTime<Utc>) -> FireOutcome {
        self.run(task_id, Some(fire_at)).await
    }

    async fn run(&self, task_id: TaskId, due: Option<DateTime<Utc>>) -> FireOutcome {
        let mut store = self.store.lock().await;

        let task_text = match store.get(task_id) {
            None => {
                tracing::debug!(task_id = %task_id, "reminder fired for deleted task, ignoring");
                return FireOutcome::Missing;
            }
            Some(task) if !task.has_pending_reminder() => {
                tracing::debug!(task_id = %task_id, "reminder already consumed, ignoring");
                return FireOutcome::AlreadyConsumed;
            }
            Some(task) if due.is_some() && task.reminder_at != due => {
                tracing::debug!(
                    task_id = %task_id,
                    armed_for = ?due,
                    current = ?task.reminder_at,
                    "reminder was rescheduled, ignoring stale timer"
                );
                return FireOutcome::Superseded;
            }
            Some(task) => task.text.to_string(),
        };

        self.events
            .emit(&DomainEvent::ReminderActivated { task_id });

        if let Err(e) = self.alarm.play(&self.tones) {
            tracing::warn!(task_id = %task_id, error = %e, "alarm sound failed");
        }

        let message = self.messages.pick().to_string();
        let delivery = self.courier.deliver(message, task_text);

        store.clear_reminder(task_id);
        self.events.emit(&DomainEvent::ReminderConsumed { task_id });

        if let Err(e) = self.repo.save(&store) {
            tracing::warn!(task_id = %task_id, error = %e, "failed to persist after reminder");
        }

        tracing::info!(task_id = %task_id, ?delivery, "reminder delivered");
        FireOutcome::Fired(delivery)
    }
}

#[async_trait]
impl ReminderHandler for ReminderTrigger {
    async fn on_fire(&self, task_id: TaskId, fire_at: DateTime<Utc>) {
        self.fire_due(task_id, fire_at).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskRecord, TaskText};
    use crate::impls::{
        InMemoryEventSink, InMemoryNotificationCenter, InMemoryStorage, RecordingAlarm,
        RecordingModal,
    };
    use crate::ports::LocalStorage;
    use chrono::{TimeZone, Utc};
    use ulid::Ulid;

    const KEY: &str = "tickler.tasks";

    struct Harness {
        trigger: ReminderTrigger,
        store: Arc<Mutex<TaskStore>>,
        storage: Arc<InMemoryStorage>,
        notifications: Arc<InMemoryNotificationCenter>,
        alarm: Arc<RecordingAlarm>,
        modal: Arc<RecordingModal>,
        events: Arc<InMemoryEventSink>,
    }

    fn harness(notifications: InMemoryNotificationCenter, alarm: RecordingAlarm) -> Harness {
        let store = Arc::new(Mutex::new(TaskStore::new()));
        let storage = Arc::new(InMemoryStorage::new());
        let notifications = Arc::new(notifications);
        let alarm = Arc::new(alarm);
        let modal = Arc::new(RecordingModal::new());
        let events = Arc::new(InMemoryEventSink::new());
        let trigger = ReminderTrigger::new(
            store.clone(),
            SnapshotRepository::new(storage.clone(), KEY),
            notifications.clone(),
            alarm.clone(),
            modal.clone(),
            events.clone(),
            MessagePool::new(vec!["Time!".to_string()]),
            "To-Do Reminder",
            Duration::from_secs(8),
        );
        Harness {
            trigger,
            store,
            storage,
            notifications,
            alarm,
            modal,
            events,
        }
    }

    async fn add_reminded(h: &Harness, text: &str) -> TaskId {
        let id = TaskId::from_ulid(Ulid::new());
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        h.store.lock().await.insert_front(TaskRecord::new(
            id,
            TaskText::new(text).unwrap(),
            Some(at),
        ));
        id
    }

    #[tokio::test]
    async fn granted_delivers_one_notification() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Granted),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;

        let outcome = h.trigger.fire(id).await;

        assert!(matches!(outcome, FireOutcome::Fired(Delivery::Notification)));
        assert_eq!(h.alarm.plays(), 1);
        let shown = h.notifications.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "To-Do Reminder");
        assert_eq!(shown[0].body, "Time!\nBuy milk");
        assert!(shown[0].silent);
        assert!(h.modal.shown().is_empty());
        assert_eq!(h.store.lock().await.get(id).unwrap().reminder_at, None);
    }

    #[tokio::test]
    async fn fire_persists_cleared_reminder() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Granted),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;

        h.trigger.fire(id).await;

        let repo = SnapshotRepository::new(h.storage.clone(), KEY);
        let loaded = repo.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(id).unwrap().reminder_at, None);
    }

    #[tokio::test(start_paused = true)]
    async fn notification_is_dismissed_after_delay() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Granted),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;
        h.trigger.fire(id).await;
        assert_eq!(h.notifications.open_notices(), 1);

        tokio::time::advance(Duration::from_millis(7_999)).await;
        tokio::task::yield_now().await;
        assert_eq!(h.notifications.open_notices(), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(h.notifications.open_notices(), 0);
    }

    #[tokio::test]
    async fn failing_notification_falls_back_to_modal() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Granted).failing(),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;

        let outcome = h.trigger.fire(id).await;

        assert!(matches!(outcome, FireOutcome::Fired(Delivery::Modal)));
        assert_eq!(h.modal.shown(), vec!["Time!\nBuy milk".to_string()]);
    }

    #[tokio::test]
    async fn denied_shows_modal_only() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Denied),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;

        let outcome = h.trigger.fire(id).await;

        assert!(matches!(outcome, FireOutcome::Fired(Delivery::Modal)));
        assert!(h.notifications.shown().is_empty());
        assert_eq!(h.notifications.permission_requests(), 0);
        assert_eq!(h.modal.shown().len(), 1);
    }

    #[tokio::test]
    async fn unsupported_shows_modal_only() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Unsupported),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;

        assert!(matches!(
            h.trigger.fire(id).await,
            FireOutcome::Fired(Delivery::Modal)
        ));
        assert_eq!(h.modal.shown().len(), 1);
    }

    /// Granting permission re-runs only the delivery step: one notification,
    /// no modal, no second alarm.
    #[tokio::test]
    async fn undecided_then_granted_notifies_once_without_modal() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Undecided).answering(Permission::Granted),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;

        let FireOutcome::Fired(Delivery::AwaitingPermission(pending)) = h.trigger.fire(id).await
        else {
            panic!("expected a pending permission request");
        };
        // 状態の更新は許可待ちを待たずに完了している
        assert_eq!(h.store.lock().await.get(id).unwrap().reminder_at, None);

        let delivered = pending.await.unwrap();

        assert!(matches!(delivered, Delivery::Notification));
        assert_eq!(h.notifications.permission_requests(), 1);
        assert_eq!(h.notifications.shown().len(), 1);
        assert!(h.modal.shown().is_empty());
        assert_eq!(h.alarm.plays(), 1);
    }

    #[tokio::test]
    async fn undecided_then_denied_falls_back_to_modal() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Undecided).answering(Permission::Denied),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;

        let FireOutcome::Fired(Delivery::AwaitingPermission(pending)) = h.trigger.fire(id).await
        else {
            panic!("expected a pending permission request");
        };

        assert!(matches!(pending.await.unwrap(), Delivery::Modal));
        assert!(h.notifications.shown().is_empty());
        assert_eq!(h.modal.shown().len(), 1);
    }

    #[tokio::test]
    async fn broken_audio_does_not_block_delivery() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Denied),
            RecordingAlarm::broken(),
        );
        let id = add_reminded(&h, "Buy milk").await;

        let outcome = h.trigger.fire(id).await;

        assert!(outcome.fired());
        assert_eq!(h.alarm.plays(), 1);
        assert_eq!(h.modal.shown().len(), 1);
        assert_eq!(h.store.lock().await.get(id).unwrap().reminder_at, None);
    }

    #[tokio::test]
    async fn deleted_task_is_a_noop() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Granted),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;
        h.store.lock().await.remove(id);

        let outcome = h.trigger.fire(id).await;

        assert!(matches!(outcome, FireOutcome::Missing));
        assert_eq!(h.alarm.plays(), 0);
        assert!(h.notifications.shown().is_empty());
        assert!(h.events.events().is_empty());
        assert_eq!(h.storage.get_item(KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn second_fire_is_a_noop_on_state() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Granted),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;

        assert!(h.trigger.fire(id).await.fired());
        let saved = h.storage.get_item(KEY).unwrap();
        let store_after_first = h.store.lock().await.clone();

        let again = h.trigger.fire(id).await;

        assert!(matches!(again, FireOutcome::AlreadyConsumed));
        assert_eq!(*h.store.lock().await, store_after_first);
        assert_eq!(h.storage.get_item(KEY).unwrap(), saved);
        assert_eq!(h.alarm.plays(), 1);
        assert_eq!(h.notifications.shown().len(), 1);
        assert_eq!(h.events.count("reminder_consumed"), 1);
    }

    #[tokio::test]
    async fn emits_activation_then_consumption() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Granted),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;

        h.trigger.fire(id).await;

        assert_eq!(
            h.events.events(),
            vec![
                DomainEvent::ReminderActivated { task_id: id },
                DomainEvent::ReminderConsumed { task_id: id },
            ]
        );
    }

    #[tokio::test]
    async fn fire_due_runs_when_reminder_still_matches() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Granted),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();

        assert!(h.trigger.fire_due(id, at).await.fired());
        assert_eq!(h.alarm.plays(), 1);
    }

    #[tokio::test]
    async fn fire_due_skips_replaced_reminder() {
        let h = harness(
            InMemoryNotificationCenter::new(Permission::Granted),
            RecordingAlarm::new(),
        );
        let id = add_reminded(&h, "Buy milk").await;
        let old = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        let new = old + chrono::Duration::hours(1);
        h.store.lock().await.set_reminder(id, Some(new));

        let outcome = h.trigger.fire_due(id, old).await;

        assert!(matches!(outcome, FireOutcome::Superseded));
        assert_eq!(h.store.lock().await.get(id).unwrap().reminder_at, Some(new));
        assert_eq!(h.alarm.plays(), 0);
        assert!(h.notifications.shown().is_empty());
        assert!(h.modal.shown().is_empty());
        assert!(h.events.events().is_empty());
        assert_eq!(h.storage.get_item(KEY).unwrap(), None);
    }
}
