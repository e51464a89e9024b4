//! Settings store: the single owner of the accessibility snapshot.
//!
//! User preferences are loaded from the key-value store, merged with the
//! OS-sourced flags, published on a watch channel and written back after
//! every change. Persistence failures are logged and never surface to the
//! caller; the in-memory snapshot stays authoritative.

use std::sync::Arc;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;

use crate::accessibility::os_signals::{OsAccessibility, OsSignal, OsSignalSource};
use crate::accessibility::settings::{
    AccessibilitySettings, FontSizeTier, PersistedSettings, SettingsPatch,
};
use crate::storage::kv::KeyValueStore;

/// Key under which the user-controlled settings are persisted.
pub const SETTINGS_KEY: &str = "luminus.accessibility_settings";

/// Owns the current [`AccessibilitySettings`] and its persistence.
pub struct SettingsStore<S: KeyValueStore> {
    storage: S,
    current: AccessibilitySettings,
    /// Bold text as chosen by the user, before OR-ing the OS flag.
    user_bold_text: bool,
    os: OsAccessibility,
    tx: watch::Sender<AccessibilitySettings>,
}

impl<S: KeyValueStore> SettingsStore<S> {
    /// Build a store over `storage` and load the persisted preferences.
    pub async fn open(storage: S, os: OsAccessibility) -> Self {
        let (tx, _) = watch::channel(AccessibilitySettings::default());
        let mut store = Self {
            storage,
            current: AccessibilitySettings::default(),
            user_bold_text: false,
            os,
            tx,
        };
        store.load().await;
        store
    }

    /// Reload from storage, then merge the last known OS state.
    ///
    /// Unreadable or corrupt data yields defaults. An already active screen
    /// reader counts as a fresh activation.
    pub async fn load(&mut self) -> AccessibilitySettings {
        let persisted = match self.storage.get(SETTINGS_KEY).await {
            Ok(Some(raw)) => match PersistedSettings::from_json_lenient(&raw) {
                Ok(persisted) => persisted,
                Err(e) => {
                    tracing::warn!("Discarding corrupt accessibility settings: {}", e);
                    PersistedSettings::default()
                }
            },
            Ok(None) => {
                tracing::debug!("No persisted accessibility settings, using defaults");
                PersistedSettings::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read accessibility settings: {}", e);
                PersistedSettings::default()
            }
        };

        let mut settings = AccessibilitySettings::default();
        persisted.apply_to(&mut settings);
        self.user_bold_text = persisted.bold_text;
        self.merge_os_fields(&mut settings);

        if self.os.screen_reader_active {
            apply_screen_reader_adjustment(&mut settings);
        }

        tracing::info!(
            "Accessibility settings loaded (tier {}, high contrast {}, screen reader {})",
            settings.font_size_tier,
            settings.high_contrast,
            settings.screen_reader_active
        );

        self.publish(settings);
        settings
    }

    /// Apply a partial update, publish it, then persist.
    pub async fn update(&mut self, patch: SettingsPatch) -> AccessibilitySettings {
        if patch.is_empty() {
            return self.current;
        }

        let mut settings = self.current;
        settings.apply(&patch);
        if let Some(bold) = patch.bold_text {
            self.user_bold_text = bold;
        }
        self.merge_os_fields(&mut settings);

        tracing::debug!("Accessibility settings updated: {:?}", patch);
        self.publish(settings);
        self.persist().await;
        settings
    }

    /// Restore default preferences and forget the persisted blob.
    ///
    /// OS-sourced fields keep their last reported values.
    pub async fn reset(&mut self) -> AccessibilitySettings {
        let mut settings = AccessibilitySettings::default();
        self.user_bold_text = false;
        self.merge_os_fields(&mut settings);

        tracing::info!("Accessibility settings reset to defaults");
        self.publish(settings);

        if let Err(e) = self.storage.remove(SETTINGS_KEY).await {
            tracing::warn!("Failed to remove persisted accessibility settings: {}", e);
        }
        settings
    }

    /// Merge one OS change into the snapshot.
    ///
    /// A screen reader turning on (and only the off-to-on transition) forces
    /// large buttons and increased spacing and bumps a medium font to large.
    pub fn apply_os_signal(&mut self, signal: OsSignal) -> AccessibilitySettings {
        let was_active = self.os.screen_reader_active;
        self.os.apply(signal);

        let mut settings = self.current;
        self.merge_os_fields(&mut settings);

        if !was_active && self.os.screen_reader_active {
            tracing::info!("Screen reader activated, enlarging controls");
            apply_screen_reader_adjustment(&mut settings);
        }

        self.publish(settings);
        settings
    }

    pub fn snapshot(&self) -> AccessibilitySettings {
        self.current
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<AccessibilitySettings> {
        self.tx.subscribe()
    }

    pub fn os_state(&self) -> OsAccessibility {
        self.os
    }

    fn merge_os_fields(&self, settings: &mut AccessibilitySettings) {
        settings.screen_reader_active = self.os.screen_reader_active;
        settings.reduce_motion = self.os.reduce_motion;
        settings.bold_text = self.user_bold_text || self.os.bold_text;
    }

    fn publish(&mut self, settings: AccessibilitySettings) {
        self.current = settings;
        self.tx.send_replace(settings);
    }

    async fn persist(&self) {
        let persisted = PersistedSettings::from_snapshot(&self.current, self.user_bold_text);
        let json = match serde_json::to_string(&persisted) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to encode accessibility settings: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(SETTINGS_KEY, json).await {
            tracing::warn!("Failed to persist accessibility settings: {}", e);
        }
    }
}

fn apply_screen_reader_adjustment(settings: &mut AccessibilitySettings) {
    settings.large_buttons = true;
    settings.increased_spacing = true;
    if settings.font_size_tier == FontSizeTier::Medium {
        settings.font_size_tier = FontSizeTier::Large;
    }
}

/// Handle for a running OS-signal subscription. Dropping it stops the task.
pub struct OsSignalSubscription {
    handle: JoinHandle<()>,
}

impl OsSignalSubscription {
    pub fn unsubscribe(self) {}

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for OsSignalSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Feed every signal from `source` into `store` until unsubscribed.
///
/// Must be called from within a tokio runtime.
pub fn subscribe_to_os_signals<S, O>(
    store: Arc<Mutex<SettingsStore<S>>>,
    source: &O,
) -> OsSignalSubscription
where
    S: KeyValueStore,
    O: OsSignalSource + ?Sized,
{
    let mut rx = source.subscribe();

    let handle = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(signal) => {
                    store.lock().await.apply_os_signal(signal);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} OS accessibility signals", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!("OS accessibility signal source closed");
                    break;
                }
            }
        }
    });

    OsSignalSubscription { handle }
}
