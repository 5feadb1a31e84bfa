//! Impls - ports の実装
//!
//! 本番（ターミナル／ファイル）用と、テスト用の記録実装を同居させています。

pub mod alarm;
pub mod event_sink;
pub mod file_storage;
pub mod memory_storage;
pub mod modal;
pub mod notifications;

pub use self::alarm::{RecordingAlarm, SilentAlarm, TerminalBell};
pub use self::event_sink::{InMemoryEventSink, NoopEventSink, TracingEventSink};
pub use self::file_storage::FileStorage;
pub use self::memory_storage::InMemoryStorage;
pub use self::modal::{RecordingModal, StderrModal};
pub use self::notifications::{InMemoryNotificationCenter, LogNotificationCenter};
