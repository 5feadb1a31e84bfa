//! AlarmSound port - 合成音の出力

use thiserror::Error;

use crate::reminder::ToneSequence;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("audio io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Best-effort tone output. Failures are logged by the caller and never block
/// reminder delivery.
pub trait AlarmSound: Send + Sync {
    fn play(&self, tones: &ToneSequence) -> Result<(), AudioError>;
}
