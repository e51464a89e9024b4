//! Tone generation for audio feedback.
//!
//! Each haptic action has a matching sine tone so that feedback is audible
//! on devices without a vibration motor.

use rodio::source::SineWave;
use rodio::{OutputStream, Sink, Source};
use std::future::Future;
use std::time::Duration;

use super::haptics::HapticPattern;
use super::AudioError;

/// Standard tone frequencies for feedback cues.
pub mod frequencies {
    /// Low tone for heavy impacts
    pub const LOW: f32 = 261.63; // C4
    /// Medium tone for medium impacts
    pub const MEDIUM: f32 = 329.63; // E4
    /// Alert tone for taps and warnings
    pub const ALERT: f32 = 880.00; // A5
    /// Success tone
    pub const SUCCESS: f32 = 1046.0;
    /// Error tone
    pub const ERROR: f32 = 440.0; // A4
}

/// A single tone with frequency and duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in Hz
    pub frequency_hz: f32,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl Tone {
    pub const fn new(frequency_hz: f32, duration_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }
}

/// The tone that accompanies a haptic action.
pub fn tone_for(pattern: HapticPattern) -> Tone {
    match pattern {
        HapticPattern::Light => Tone::new(frequencies::ALERT, 50),
        HapticPattern::Medium => Tone::new(frequencies::MEDIUM, 100),
        HapticPattern::Heavy => Tone::new(frequencies::LOW, 200),
        HapticPattern::Success => Tone::new(frequencies::SUCCESS, 150),
        HapticPattern::Warning => Tone::new(frequencies::ALERT, 120),
        HapticPattern::Error => Tone::new(frequencies::ERROR, 200),
    }
}

/// Plays short tones.
pub trait ToneEngine: Send + Sync + 'static {
    fn play_tone(&self, tone: Tone) -> impl Future<Output = Result<(), AudioError>> + Send;
}

/// Tone engine using a rodio sine wave.
pub struct RodioToneEngine {
    /// Volume level (0.0 - 1.0)
    volume: f32,
}

impl Default for RodioToneEngine {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl RodioToneEngine {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl ToneEngine for RodioToneEngine {
    async fn play_tone(&self, tone: Tone) -> Result<(), AudioError> {
        if tone.frequency_hz <= 0.0 || tone.duration_ms == 0 {
            return Ok(());
        }

        let volume = self.volume;

        tokio::task::spawn_blocking(move || {
            // Output stream must live on the playback thread
            let (_stream, stream_handle) = OutputStream::try_default()
                .map_err(|e| AudioError::DeviceNotAvailable(e.to_string()))?;

            let sink = Sink::try_new(&stream_handle)
                .map_err(|e| AudioError::PlaybackFailed(e.to_string()))?;

            let source = SineWave::new(tone.frequency_hz)
                .take_duration(Duration::from_millis(tone.duration_ms))
                .amplify(volume);

            sink.append(source);
            sink.sleep_until_end();

            Ok(())
        })
        .await
        .map_err(|e| AudioError::PlaybackFailed(e.to_string()))?
    }
}
