//! Reminder - スケジューラ（タイマー表）と発火時の処理

pub mod scheduler;
pub mod tone;
pub mod trigger;

pub use self::scheduler::{ReminderHandler, ReminderScheduler};
pub use self::tone::{Tone, ToneSequence};
pub use self::trigger::{Delivery, FireOutcome, ReminderTrigger};
