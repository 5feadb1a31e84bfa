//! Configuration.
//!
//! Every field has a compiled default, so a partial JSON file (or none at
//! all) is valid. Durations are stored in milliseconds.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::TicklerError;
use crate::domain::message::default_messages;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicklerConfig {
    /// Key the snapshot is stored under.
    pub storage_key: String,

    /// Reminders due within this window fire after `grace_delay_ms`.
    pub immediate_threshold_ms: u64,

    pub grace_delay_ms: u64,

    pub notification_dismiss_after_ms: u64,

    pub notification_title: String,

    /// Ask for notification permission at startup when still undecided.
    pub request_permission_on_open: bool,

    pub messages: Vec<String>,
}

impl Default for TicklerConfig {
    fn default() -> Self {
        Self {
            storage_key: "tickler.tasks".to_string(),
            immediate_threshold_ms: 1_000,
            grace_delay_ms: 200,
            notification_dismiss_after_ms: 8_000,
            notification_title: "To-Do Reminder".to_string(),
            request_permission_on_open: true,
            messages: default_messages(),
        }
    }
}

impl TicklerConfig {
    pub fn from_json_str(s: &str) -> Result<Self, TicklerError> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| TicklerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, TicklerError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| TicklerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), TicklerError> {
        if self.storage_key.trim().is_empty() {
            return Err(TicklerError::Config("storage_key must not be empty".to_string()));
        }
        if self.grace_delay_ms == 0 {
            // 0 だと呼び出し中の処理と同じ tick で発火してしまう
            return Err(TicklerError::Config("grace_delay_ms must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn immediate_threshold(&self) -> Duration {
        Duration::from_millis(self.immediate_threshold_ms)
    }

    pub fn grace_delay(&self) -> Duration {
        Duration::from_millis(self.grace_delay_ms)
    }

    pub fn notification_dismiss_after(&self) -> Duration {
        Duration::from_millis(self.notification_dismiss_after_ms)
    }
}
