//! tickler-core
//!
//! To-do list with per-task reminders.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, snapshot, events, message, errors）
//! - **ports**: ホスト環境の抽象化（Clock, LocalStorage, NotificationCenter, AlarmSound, ModalPresenter, EventSink）
//! - **impls**: ports の実装（ファイル / メモリ / ターミナル / テスト用記録）
//! - **store**: タスク一覧とスナップショットの保存・復元
//! - **reminder**: タイマー表（scheduler）と発火処理（trigger）
//! - **app**: intents の受け口（Tickler）とワイヤリング（TicklerBuilder）
//! - **config**: 設定（JSON、全項目デフォルトあり）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod reminder;
pub mod store;

pub use app::{Tickler, TicklerBuilder};
pub use config::TicklerConfig;
pub use domain::{DomainEvent, TaskId, TaskRecord, TicklerError};
pub use reminder::{Delivery, FireOutcome};
