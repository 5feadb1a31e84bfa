//! NotificationCenter port - システム通知
//!
//! 許可状態は 3 値（granted / default / denied）+ 非対応。
//! 許可リクエストは非同期で、いずれかの状態に解決されます。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::NoticeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Granted,
    /// The user has not been asked yet.
    Undecided,
    Denied,
    /// The platform has no notification support at all.
    Unsupported,
}

impl Permission {
    pub fn is_granted(self) -> bool {
        matches!(self, Permission::Granted)
    }
}

/// A system-level notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    /// The alarm tone is played separately, so notices are shown silently.
    pub silent: bool,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification permission is {0:?}")]
    NotPermitted(Permission),

    #[error("notification backend failed: {0}")]
    Backend(String),
}

#[async_trait]
pub trait NotificationCenter: Send + Sync {
    fn permission(&self) -> Permission;

    /// Ask the user. Resolves to the state chosen (or the current one if
    /// asking is not possible).
    async fn request_permission(&self) -> Permission;

    fn show(&self, notice: &Notice) -> Result<NoticeId, NotifyError>;

    /// Dismiss a shown notice. Unknown ids are ignored.
    fn close(&self, id: NoticeId);
}
