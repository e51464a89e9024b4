//! Feedback sequencer.
//!
//! Turns a UI event into a short timed pattern of haptic pulses and tones.
//! Every step runs on its own timer task, so a slow or failing primitive
//! never delays the steps after it. Overlapping triggers are not merged.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::haptics::{HapticEngine, HapticPattern};
use super::tones::{tone_for, ToneEngine};
use crate::accessibility::settings::AccessibilitySettings;

/// UI events that produce feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackEvent {
    Tap,
    Success,
    Error,
    Warning,
}

/// One step of a feedback pattern, relative to the trigger time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackStep {
    pub pattern: HapticPattern,
    pub delay: Duration,
}

const fn step(pattern: HapticPattern, delay_ms: u64) -> FeedbackStep {
    FeedbackStep {
        pattern,
        delay: Duration::from_millis(delay_ms),
    }
}

const TAP: &[FeedbackStep] = &[step(HapticPattern::Light, 0)];

const SUCCESS: &[FeedbackStep] = &[
    step(HapticPattern::Success, 0),
    step(HapticPattern::Light, 100),
];

const ERROR: &[FeedbackStep] = &[
    step(HapticPattern::Error, 0),
    step(HapticPattern::Medium, 80),
    step(HapticPattern::Medium, 160),
];

const WARNING: &[FeedbackStep] = &[
    step(HapticPattern::Warning, 0),
    step(HapticPattern::Light, 120),
];

impl FeedbackEvent {
    pub const ALL: [FeedbackEvent; 4] = [
        FeedbackEvent::Tap,
        FeedbackEvent::Success,
        FeedbackEvent::Error,
        FeedbackEvent::Warning,
    ];

    /// The fixed step list for this event.
    pub fn sequence(&self) -> &'static [FeedbackStep] {
        match self {
            FeedbackEvent::Tap => TAP,
            FeedbackEvent::Success => SUCCESS,
            FeedbackEvent::Error => ERROR,
            FeedbackEvent::Warning => WARNING,
        }
    }

    /// Total time from trigger to the last step.
    pub fn span(&self) -> Duration {
        self.sequence()
            .iter()
            .map(|s| s.delay)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

impl std::fmt::Display for FeedbackEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackEvent::Tap => write!(f, "Tap"),
            FeedbackEvent::Success => write!(f, "Success"),
            FeedbackEvent::Error => write!(f, "Error"),
            FeedbackEvent::Warning => write!(f, "Warning"),
        }
    }
}

/// Schedules haptic and tone primitives for feedback events.
pub struct FeedbackSequencer<H, T> {
    haptics: Arc<H>,
    tones: Arc<T>,
}

impl<H, T> Clone for FeedbackSequencer<H, T> {
    fn clone(&self) -> Self {
        Self {
            haptics: Arc::clone(&self.haptics),
            tones: Arc::clone(&self.tones),
        }
    }
}

impl<H: HapticEngine, T: ToneEngine> FeedbackSequencer<H, T> {
    pub fn new(haptics: H, tones: T) -> Self {
        Self::from_shared(Arc::new(haptics), Arc::new(tones))
    }

    pub fn from_shared(haptics: Arc<H>, tones: Arc<T>) -> Self {
        Self { haptics, tones }
    }

    /// Fire `event` under the gates of `settings`.
    ///
    /// Returns immediately. The handle resolves once every step has fired;
    /// callers are free to drop it. Must be called within a tokio runtime.
    pub fn trigger(&self, event: FeedbackEvent, settings: &AccessibilitySettings) -> JoinHandle<()> {
        let haptics_on = settings.haptic_feedback;
        let sound_on = settings.sound_enabled;

        if !haptics_on && !sound_on {
            tracing::debug!("Feedback {} suppressed: haptics and sound disabled", event);
            return tokio::spawn(async {});
        }

        tracing::debug!("Feedback {} (haptics {}, sound {})", event, haptics_on, sound_on);

        let steps: Vec<JoinHandle<()>> = event
            .sequence()
            .iter()
            .map(|step| {
                let haptics = Arc::clone(&self.haptics);
                let tones = Arc::clone(&self.tones);
                let step = *step;

                tokio::spawn(async move {
                    if !step.delay.is_zero() {
                        tokio::time::sleep(step.delay).await;
                    }

                    let haptic = async {
                        if haptics_on {
                            if let Err(e) = haptics.play(step.pattern).await {
                                tracing::warn!("Haptic {:?} failed: {}", step.pattern, e);
                            }
                        }
                    };
                    let tone = async {
                        if sound_on {
                            if let Err(e) = tones.play_tone(tone_for(step.pattern)).await {
                                tracing::warn!("Tone for {:?} failed: {}", step.pattern, e);
                            }
                        }
                    };

                    futures::join!(haptic, tone);
                })
            })
            .collect();

        tokio::spawn(async move {
            for result in futures::future::join_all(steps).await {
                if let Err(e) = result {
                    tracing::warn!("Feedback step task failed: {}", e);
                }
            }
        })
    }
}
