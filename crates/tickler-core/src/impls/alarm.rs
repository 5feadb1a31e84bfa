//! AlarmSound 実装
//!
//! - TerminalBell: 端末の BEL 文字で鳴らす
//! - SilentAlarm: 何もしない（ヘッドレス）
//! - RecordingAlarm: 再生回数を記録、失敗させることも可能（テスト用）

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ports::{AlarmSound, AudioError};
use crate::reminder::ToneSequence;

/// Rings the terminal bell once per tone on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl AlarmSound for TerminalBell {
    fn play(&self, tones: &ToneSequence) -> Result<(), AudioError> {
        let bells = "\x07".repeat(tones.tones().len());
        let mut err = std::io::stderr().lock();
        err.write_all(bells.as_bytes())?;
        err.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAlarm;

impl AlarmSound for SilentAlarm {
    fn play(&self, _tones: &ToneSequence) -> Result<(), AudioError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingAlarm {
    plays: AtomicUsize,
    broken: bool,
}

impl RecordingAlarm {
    pub fn new() -> Self {
        Self::default()
    }

    /// An alarm whose output device is missing. Attempts are still counted.
    pub fn broken() -> Self {
        Self {
            plays: AtomicUsize::new(0),
            broken: true,
        }
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl AlarmSound for RecordingAlarm {
    fn play(&self, _tones: &ToneSequence) -> Result<(), AudioError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(AudioError::Unavailable("no output device".to_string()));
        }
        Ok(())
    }
}
