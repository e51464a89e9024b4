//! Operating-system accessibility signals.
//!
//! The OS owns three flags: screen reader, bold text and reduce motion.
//! Platform adapters publish changes on an [`OsSignalBus`]; the settings
//! store subscribes to it and merges each change into its snapshot.

use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

/// Capacity of the signal channel. Signals are rare; lagging receivers
/// only lose intermediate toggles.
const SIGNAL_CHANNEL_CAPACITY: usize = 32;

/// A single OS accessibility change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsSignal {
    ScreenReaderChanged(bool),
    BoldTextChanged(bool),
    ReduceMotionChanged(bool),
}

/// Last known values of the OS-sourced flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OsAccessibility {
    pub screen_reader_active: bool,
    pub bold_text: bool,
    pub reduce_motion: bool,
}

impl OsAccessibility {
    /// Fold a signal into this state.
    pub fn apply(&mut self, signal: OsSignal) {
        match signal {
            OsSignal::ScreenReaderChanged(active) => self.screen_reader_active = active,
            OsSignal::BoldTextChanged(enabled) => self.bold_text = enabled,
            OsSignal::ReduceMotionChanged(enabled) => self.reduce_motion = enabled,
        }
    }
}

/// Source of OS accessibility state and change notifications.
pub trait OsSignalSource: Send + Sync {
    /// Current OS state, read at startup.
    fn current(&self) -> OsAccessibility;

    /// Receive every subsequent change.
    fn subscribe(&self) -> broadcast::Receiver<OsSignal>;
}

/// In-process signal bus fed by a platform adapter (or by tests).
pub struct OsSignalBus {
    state: Mutex<OsAccessibility>,
    tx: broadcast::Sender<OsSignal>,
}

impl Default for OsSignalBus {
    fn default() -> Self {
        Self::new(OsAccessibility::default())
    }
}

impl OsSignalBus {
    pub fn new(initial: OsAccessibility) -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(initial),
            tx,
        }
    }

    /// Publish a change. Signals that do not change the state are dropped.
    pub fn emit(&self, signal: OsSignal) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let before = *state;
            state.apply(signal);
            if *state == before {
                return;
            }
        }

        tracing::debug!("OS accessibility signal: {:?}", signal);
        // No subscribers yet is fine; the state is still recorded.
        let _ = self.tx.send(signal);
    }
}

impl OsSignalSource for OsSignalBus {
    fn current(&self) -> OsAccessibility {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribe(&self) -> broadcast::Receiver<OsSignal> {
        self.tx.subscribe()
    }
}
