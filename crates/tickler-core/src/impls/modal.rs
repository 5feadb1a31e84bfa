//! ModalPresenter 実装

use std::sync::{Mutex, PoisonError};

use crate::ports::ModalPresenter;

/// Prints the message in a box on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrModal;

impl ModalPresenter for StderrModal {
    fn show_modal(&self, text: &str) {
        let width = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let border = "-".repeat(width + 4);
        eprintln!("+{border}+");
        for line in text.lines() {
            eprintln!("|  {line:<width$}  |");
        }
        eprintln!("+{border}+");
    }
}

/// Remembers every modal shown.
#[derive(Debug, Default)]
pub struct RecordingModal {
    shown: Mutex<Vec<String>>,
}

impl RecordingModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ModalPresenter for RecordingModal {
    fn show_modal(&self, text: &str) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}
