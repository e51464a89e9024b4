//! Haptic primitives.

use std::future::Future;

use super::AudioError;

/// Impact strength for a single pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    Light,
    Medium,
    Heavy,
}

/// Platform notification feedback types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

/// One haptic action inside a feedback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    Light,
    Medium,
    Heavy,
    Success,
    Warning,
    Error,
}

/// Device vibration motor.
pub trait HapticEngine: Send + Sync + 'static {
    /// Fire an impact pulse.
    fn pulse(&self, intensity: Intensity)
        -> impl Future<Output = Result<(), AudioError>> + Send;

    /// Fire a notification pattern.
    fn notify(&self, kind: NotificationKind)
        -> impl Future<Output = Result<(), AudioError>> + Send;

    /// Fire the primitive behind a sequence step.
    fn play(&self, pattern: HapticPattern) -> impl Future<Output = Result<(), AudioError>> + Send {
        async move {
            match pattern {
                HapticPattern::Light => self.pulse(Intensity::Light).await,
                HapticPattern::Medium => self.pulse(Intensity::Medium).await,
                HapticPattern::Heavy => self.pulse(Intensity::Heavy).await,
                HapticPattern::Success => self.notify(NotificationKind::Success).await,
                HapticPattern::Warning => self.notify(NotificationKind::Warning).await,
                HapticPattern::Error => self.notify(NotificationKind::Error).await,
            }
        }
    }
}

/// Desktop machines have no vibration motor; pulses are only traced.
#[derive(Debug, Default, Clone)]
pub struct DesktopHaptics;

impl HapticEngine for DesktopHaptics {
    async fn pulse(&self, intensity: Intensity) -> Result<(), AudioError> {
        tracing::debug!("Haptic pulse: {:?}", intensity);
        Ok(())
    }

    async fn notify(&self, kind: NotificationKind) -> Result<(), AudioError> {
        tracing::debug!("Haptic notification: {:?}", kind);
        Ok(())
    }
}
