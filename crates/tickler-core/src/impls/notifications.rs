//! NotificationCenter 実装
//!
//! - LogNotificationCenter: tracing にログとして出す（デモ・ヘッドレス用）
//! - InMemoryNotificationCenter: 表示内容を記録する（テスト用）

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use ulid::Ulid;

use crate::domain::NoticeId;
use crate::ports::{Notice, NotificationCenter, NotifyError, Permission};

/// Shared permission state machine: an undecided permission resolves to the
/// configured answer on the first request, later requests return whatever
/// was decided.
#[derive(Debug)]
struct PermissionState {
    current: Permission,
    answer: Permission,
}

impl PermissionState {
    fn request(&mut self) -> Permission {
        if self.current == Permission::Undecided {
            self.current = self.answer;
        }
        self.current
    }
}

/// Notification center that writes notices to the log.
#[derive(Debug)]
pub struct LogNotificationCenter {
    state: Mutex<PermissionState>,
}

impl LogNotificationCenter {
    /// `answer` is what an undecided permission resolves to when requested.
    pub fn new(permission: Permission, answer: Permission) -> Self {
        Self {
            state: Mutex::new(PermissionState {
                current: permission,
                answer,
            }),
        }
    }

    pub fn granted() -> Self {
        Self::new(Permission::Granted, Permission::Granted)
    }
}

#[async_trait]
impl NotificationCenter for LogNotificationCenter {
    fn permission(&self) -> Permission {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
    }

    async fn request_permission(&self) -> Permission {
        let decided = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .request();
        tracing::info!(permission = ?decided, "notification permission resolved");
        decided
    }

    fn show(&self, notice: &Notice) -> Result<NoticeId, NotifyError> {
        let permission = self.permission();
        if !permission.is_granted() {
            return Err(NotifyError::NotPermitted(permission));
        }
        let id = NoticeId::from_ulid(Ulid::new());
        tracing::info!(notice_id = %id, title = %notice.title, body = %notice.body, "notification");
        Ok(id)
    }

    fn close(&self, id: NoticeId) {
        tracing::debug!(notice_id = %id, "notification closed");
    }
}

#[derive(Debug, Default)]
struct Recorded {
    shown: Vec<(NoticeId, Notice)>,
    closed: Vec<NoticeId>,
    requests: usize,
}

/// Notification center that records everything it is asked to do.
#[derive(Debug)]
pub struct InMemoryNotificationCenter {
    state: Mutex<PermissionState>,
    fail_show: bool,
    recorded: Mutex<Recorded>,
}

impl InMemoryNotificationCenter {
    pub fn new(permission: Permission) -> Self {
        Self {
            state: Mutex::new(PermissionState {
                current: permission,
                answer: permission,
            }),
            fail_show: false,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// What an undecided permission resolves to when requested.
    pub fn answering(self, answer: Permission) -> Self {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .answer = answer;
        self
    }

    /// Make every `show` fail with a backend error.
    pub fn failing(mut self) -> Self {
        self.fail_show = true;
        self
    }

    pub fn shown(&self) -> Vec<Notice> {
        self.recorded()
            .shown
            .iter()
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub fn closed(&self) -> Vec<NoticeId> {
        self.recorded().closed.clone()
    }

    pub fn open_notices(&self) -> usize {
        let recorded = self.recorded();
        recorded
            .shown
            .iter()
            .filter(|(id, _)| !recorded.closed.contains(id))
            .count()
    }

    pub fn permission_requests(&self) -> usize {
        self.recorded().requests
    }

    fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl NotificationCenter for InMemoryNotificationCenter {
    fn permission(&self) -> Permission {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
    }

    async fn request_permission(&self) -> Permission {
        self.recorded().requests += 1;
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .request()
    }

    fn show(&self, notice: &Notice) -> Result<NoticeId, NotifyError> {
        let permission = self.permission();
        if !permission.is_granted() {
            return Err(NotifyError::NotPermitted(permission));
        }
        if self.fail_show {
            return Err(NotifyError::Backend("show refused".to_string()));
        }
        let id = NoticeId::from_ulid(Ulid::new());
        self.recorded().shown.push((id, notice.clone()));
        Ok(id)
    }

    fn close(&self, id: NoticeId) {
        self.recorded().closed.push(id);
    }
}
