//! TicklerBuilder - ports のワイヤリングと起動時の復元
//!
//! # 起動フロー（open）
//! 1. 設定を検証（Fail-fast）
//! 2. LocalStorage から snapshot を読む（壊れていれば空）
//! 3. reminder_at を持つタスクをすべてスケジューラに 1 回ずつ渡す
//!    （過去の時刻は grace delay 後に 1 回だけ発火）
//! 4. 通知許可が未決定なら裏でリクエスト

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::TicklerConfig;
use crate::domain::{DomainEvent, MessagePool, TicklerError};
use crate::impls::{InMemoryStorage, LogNotificationCenter, SilentAlarm, StderrModal, TracingEventSink};
use crate::ports::{
    AlarmSound, Clock, EventSink, IdGenerator, LocalStorage, ModalPresenter,
    MonotonicIdGenerator, NotificationCenter, Permission, SystemClock,
};
use crate::reminder::{ReminderHandler, ReminderScheduler, ReminderTrigger};
use crate::store::SnapshotRepository;

use super::Tickler;

/// Wires the host ports together and opens a [`Tickler`].
///
/// # 使用例
/// ```ignore
/// let tickler = TicklerBuilder::new()
///     .storage(Arc::new(FileStorage::new("~/.tickler")))
///     .notifications(Arc::new(LogNotificationCenter::granted()))
///     .open()
///     .await?;
/// ```
pub struct TicklerBuilder {
    config: TicklerConfig,
    clock: Arc<dyn Clock>,
    storage: Arc<dyn LocalStorage>,
    notifications: Arc<dyn NotificationCenter>,
    alarm: Arc<dyn AlarmSound>,
    modal: Arc<dyn ModalPresenter>,
    events: Arc<dyn EventSink>,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl TicklerBuilder {
    pub fn new() -> Self {
        Self {
            config: TicklerConfig::default(),
            clock: Arc::new(SystemClock),
            storage: Arc::new(InMemoryStorage::new()),
            notifications: Arc::new(LogNotificationCenter::new(
                Permission::Undecided,
                Permission::Denied,
            )),
            alarm: Arc::new(SilentAlarm),
            modal: Arc::new(StderrModal),
            events: Arc::new(TracingEventSink),
            ids: None,
        }
    }

    pub fn config(mut self, config: TicklerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn storage(mut self, storage: Arc<dyn LocalStorage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn notifications(mut self, notifications: Arc<dyn NotificationCenter>) -> Self {
        self.notifications = notifications;
        self
    }

    pub fn alarm(mut self, alarm: Arc<dyn AlarmSound>) -> Self {
        self.alarm = alarm;
        self
    }

    pub fn modal(mut self, modal: Arc<dyn ModalPresenter>) -> Self {
        self.modal = modal;
        self
    }

    pub fn events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Defaults to a monotonic ULID generator on the builder's clock.
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Load the stored tasks and re-arm their pending reminders.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn open(self) -> Result<Tickler, TicklerError> {
        self.config.validate()?;

        let repo = SnapshotRepository::new(Arc::clone(&self.storage), self.config.storage_key.clone());
        let store = repo.load();
        let pending = store.pending_reminders();
        let restored = store.len();
        let store = Arc::new(Mutex::new(store));

        let trigger = Arc::new(ReminderTrigger::new(
            Arc::clone(&store),
            repo.clone(),
            Arc::clone(&self.notifications),
            self.alarm,
            self.modal,
            Arc::clone(&self.events),
            MessagePool::new(self.config.messages.clone()),
            self.config.notification_title.clone(),
            self.config.notification_dismiss_after(),
        ));

        let scheduler = ReminderScheduler::new(
            Arc::clone(&self.clock),
            Arc::clone(&trigger) as Arc<dyn ReminderHandler>,
            self.config.immediate_threshold(),
            self.config.grace_delay(),
        );

        for (task_id, fire_at) in &pending {
            scheduler.schedule(*task_id, *fire_at).await;
        }

        self.events.emit(&DomainEvent::SnapshotRestored {
            tasks: restored,
            pending_reminders: pending.len(),
        });
        tracing::info!(
            tasks = restored,
            pending_reminders = pending.len(),
            key = %repo.key(),
            "tickler opened"
        );

        if self.config.request_permission_on_open
            && self.notifications.permission() == Permission::Undecided
        {
            let notifications = Arc::clone(&self.notifications);
            tokio::spawn(async move {
                let decided = notifications.request_permission().await;
                tracing::debug!(permission = ?decided, "startup permission request resolved");
            });
        }

        let ids: Arc<dyn IdGenerator> = match self.ids {
            Some(ids) => ids,
            None => Arc::new(MonotonicIdGenerator::new(Arc::clone(&self.clock))),
        };

        Ok(Tickler {
            store,
            repo,
            scheduler,
            trigger,
            ids,
            events: self.events,
        })
    }
}

impl Default for TicklerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
