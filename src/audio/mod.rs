//! Audio, haptic and speech output.
//!
//! Provides the primitives (haptic pulses, sine tones, speech synthesis)
//! and the two coordinators built on top of them:
//! - [`FeedbackSequencer`]: timed haptic/tone patterns for UI events
//! - [`SpeechController`]: single-utterance speech with callbacks

pub mod feedback;
pub mod haptics;
pub mod speech;
pub mod tones;

use thiserror::Error;

// Re-export main types
pub use feedback::{FeedbackEvent, FeedbackSequencer, FeedbackStep};
pub use haptics::{DesktopHaptics, HapticEngine, HapticPattern, Intensity, NotificationKind};
pub use speech::{
    SpeechCallbacks, SpeechController, SpeechEngine, SpeechState, TtsSpeechEngine, Utterance,
};
pub use tones::{tone_for, RodioToneEngine, Tone, ToneEngine};

/// Errors that can occur during audio operations
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    #[error("TTS initialization failed: {0}")]
    TtsInitFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Speech failed: {0}")]
    SpeechFailed(String),
}
