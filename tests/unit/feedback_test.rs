//! Unit tests for the feedback sequencer.
//!
//! Time is paused, so step offsets are measured on tokio's virtual clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use luminus::audio::{
    AudioError, FeedbackEvent, FeedbackSequencer, HapticEngine, HapticPattern, Intensity,
    NotificationKind, Tone, ToneEngine,
};
use luminus::AccessibilitySettings;
use tokio::time::Instant;

type Log<T> = Arc<Mutex<Vec<(Duration, T)>>>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Haptic {
    Pulse(Intensity),
    Notify(NotificationKind),
}

struct RecordingHaptics {
    start: Instant,
    log: Log<Haptic>,
    fail: bool,
}

impl HapticEngine for RecordingHaptics {
    async fn pulse(&self, intensity: Intensity) -> Result<(), AudioError> {
        self.log
            .lock()
            .unwrap()
            .push((self.start.elapsed(), Haptic::Pulse(intensity)));
        if self.fail {
            return Err(AudioError::DeviceNotAvailable("no motor".into()));
        }
        Ok(())
    }

    async fn notify(&self, kind: NotificationKind) -> Result<(), AudioError> {
        self.log
            .lock()
            .unwrap()
            .push((self.start.elapsed(), Haptic::Notify(kind)));
        if self.fail {
            return Err(AudioError::DeviceNotAvailable("no motor".into()));
        }
        Ok(())
    }
}

struct RecordingTones {
    start: Instant,
    log: Log<Tone>,
}

impl ToneEngine for RecordingTones {
    async fn play_tone(&self, tone: Tone) -> Result<(), AudioError> {
        self.log.lock().unwrap().push((self.start.elapsed(), tone));
        Ok(())
    }
}

struct Harness {
    sequencer: FeedbackSequencer<RecordingHaptics, RecordingTones>,
    haptics: Log<Haptic>,
    tones: Log<Tone>,
}

fn harness(fail_haptics: bool) -> Harness {
    let start = Instant::now();
    let haptics: Log<Haptic> = Arc::default();
    let tones: Log<Tone> = Arc::default();
    let sequencer = FeedbackSequencer::new(
        RecordingHaptics {
            start,
            log: Arc::clone(&haptics),
            fail: fail_haptics,
        },
        RecordingTones {
            start,
            log: Arc::clone(&tones),
        },
    );
    Harness {
        sequencer,
        haptics,
        tones,
    }
}

fn sorted<T: Clone>(log: &Log<T>) -> Vec<(Duration, T)> {
    let mut entries = log.lock().unwrap().clone();
    entries.sort_by_key(|(at, _)| *at);
    entries
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn settings(haptic_feedback: bool, sound_enabled: bool) -> AccessibilitySettings {
    AccessibilitySettings {
        haptic_feedback,
        sound_enabled,
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_error_with_sound_only() {
    let h = harness(false);
    h.sequencer
        .trigger(FeedbackEvent::Error, &settings(false, true))
        .await
        .unwrap();

    assert!(h.haptics.lock().unwrap().is_empty());
    assert_eq!(
        sorted(&h.tones),
        vec![
            (ms(0), Tone::new(440.0, 200)),
            (ms(80), Tone::new(329.63, 100)),
            (ms(160), Tone::new(329.63, 100)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_success_with_haptics_only() {
    let h = harness(false);
    h.sequencer
        .trigger(FeedbackEvent::Success, &settings(true, false))
        .await
        .unwrap();

    assert!(h.tones.lock().unwrap().is_empty());
    assert_eq!(
        sorted(&h.haptics),
        vec![
            (ms(0), Haptic::Notify(NotificationKind::Success)),
            (ms(100), Haptic::Pulse(Intensity::Light)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_warning_fires_both_channels() {
    let h = harness(false);
    h.sequencer
        .trigger(FeedbackEvent::Warning, &settings(true, true))
        .await
        .unwrap();

    assert_eq!(
        sorted(&h.haptics),
        vec![
            (ms(0), Haptic::Notify(NotificationKind::Warning)),
            (ms(120), Haptic::Pulse(Intensity::Light)),
        ]
    );
    assert_eq!(
        sorted(&h.tones),
        vec![(ms(0), Tone::new(880.0, 120)), (ms(120), Tone::new(880.0, 50))]
    );
}

#[tokio::test(start_paused = true)]
async fn test_both_gates_off_is_silent() {
    let h = harness(false);
    for event in FeedbackEvent::ALL {
        h.sequencer
            .trigger(event, &settings(false, false))
            .await
            .unwrap();
    }
    assert!(h.haptics.lock().unwrap().is_empty());
    assert!(h.tones.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failing_haptics_do_not_stop_sequence() {
    let h = harness(true);
    h.sequencer
        .trigger(FeedbackEvent::Error, &settings(true, true))
        .await
        .unwrap();

    assert_eq!(h.haptics.lock().unwrap().len(), 3);
    assert_eq!(h.tones.lock().unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_triggers_are_not_merged() {
    let h = harness(false);
    let first = h.sequencer.trigger(FeedbackEvent::Tap, &settings(false, true));
    let second = h.sequencer.trigger(FeedbackEvent::Tap, &settings(false, true));
    first.await.unwrap();
    second.await.unwrap();

    assert_eq!(h.tones.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_trigger_returns_before_steps_fire() {
    let h = harness(false);
    let handle = h
        .sequencer
        .trigger(FeedbackEvent::Error, &settings(false, true));

    // Nothing has been polled yet; the caller was not blocked.
    assert!(h.tones.lock().unwrap().is_empty());
    handle.await.unwrap();
    assert_eq!(h.tones.lock().unwrap().len(), 3);
}
