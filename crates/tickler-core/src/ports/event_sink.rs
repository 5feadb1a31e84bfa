//! EventSink port - イベント記録の抽象化
//!
//! - NoopEventSink: 何もしない
//! - TracingEventSink: tracing に出す
//! - InMemoryEventSink: テスト用に記録

use crate::domain::DomainEvent;

/// EventSink はドメインイベントを受け取る（表示層の再描画フック）
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &DomainEvent);
}
