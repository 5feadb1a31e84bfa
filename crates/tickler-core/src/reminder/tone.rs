//! Alarm tone sequence.

use std::time::Duration;

/// One beep of the alarm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    /// Offset from the start of the sequence.
    pub start: Duration,
    pub length: Duration,
    pub gain: f32,
}

/// A short rising sequence of sine beeps.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSequence {
    tones: Vec<Tone>,
    release: Duration,
}

impl ToneSequence {
    const STEPS: u32 = 6;
    const BASE_HZ: f32 = 600.0;
    const STEP_HZ: f32 = 80.0;
    const BEEP: Duration = Duration::from_millis(150);
    const SPACING: Duration = Duration::from_millis(250);
    const RELEASE: Duration = Duration::from_millis(200);

    /// Six beeps rising 80 Hz each, quieter each step.
    pub fn alarm() -> Self {
        let tones = (0..Self::STEPS)
            .map(|i| Tone {
                frequency_hz: Self::BASE_HZ + Self::STEP_HZ * i as f32,
                start: Self::SPACING * i,
                length: Self::BEEP,
                gain: 0.25 / (i + 1) as f32,
            })
            .collect();
        Self {
            tones,
            release: Self::RELEASE,
        }
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    /// Time from the first beep until the fade-out finishes.
    pub fn total_duration(&self) -> Duration {
        let beeps = Self::SPACING * self.tones.len() as u32;
        beeps + self.release
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alarm_rises_and_fades() {
        let seq = ToneSequence::alarm();
        let tones = seq.tones();

        assert_eq!(tones.len(), 6);
        assert_eq!(tones[0].frequency_hz, 600.0);
        assert_eq!(tones[5].frequency_hz, 1000.0);
        assert!(tones.windows(2).all(|w| w[1].gain < w[0].gain));
        assert_eq!(tones[3].start, Duration::from_millis(750));
    }

    #[test]
    fn total_duration_includes_release() {
        assert_eq!(ToneSequence::alarm().total_duration(), Duration::from_millis(1700));
    }
}
