//! Ports - ホスト環境（ブラウザ）への抽象化レイヤー
//!
//! 各 trait はブラウザ API（localStorage, Notification, AudioContext, DOM modal）
//! の代わりになるインターフェースです。実装は `impls` にあります。

pub mod alarm;
pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod local_storage;
pub mod modal;
pub mod notifications;

pub use self::alarm::{AlarmSound, AudioError};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, MonotonicIdGenerator};
pub use self::local_storage::LocalStorage;
pub use self::modal::ModalPresenter;
pub use self::notifications::{Notice, NotificationCenter, NotifyError, Permission};
