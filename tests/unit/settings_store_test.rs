//! Unit tests for the settings store.

use luminus::accessibility::{OsAccessibility, OsSignal, PersistedSettings};
use luminus::storage::{KeyValueStore, MemoryKeyValueStore, StorageError, SETTINGS_KEY};
use luminus::{AccessibilitySettings, FontSizeTier, SettingsPatch, SettingsStore};

/// Storage that fails every operation.
struct BrokenStore;

fn disk_gone() -> StorageError {
    StorageError::Io(std::io::Error::other("disk gone"))
}

impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(disk_gone())
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(disk_gone())
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(disk_gone())
    }
}

fn persisted(kv: &MemoryKeyValueStore) -> PersistedSettings {
    let raw = kv.raw(SETTINGS_KEY).expect("settings persisted");
    PersistedSettings::from_json_lenient(&raw).unwrap()
}

#[tokio::test]
async fn test_update_publishes_and_persists() {
    let kv = MemoryKeyValueStore::new();
    let mut store = SettingsStore::open(kv.clone(), OsAccessibility::default()).await;
    let mut rx = store.subscribe();

    let settings = store
        .update(SettingsPatch::new().high_contrast(true).speech_rate(1.4))
        .await;

    assert!(settings.high_contrast);
    assert_eq!(settings.speech_rate, 1.4);
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), settings);

    let saved = persisted(&kv);
    assert!(saved.high_contrast);
    assert_eq!(saved.speech_rate, 1.4);
}

#[tokio::test]
async fn test_update_clamps_speech() {
    let mut store = SettingsStore::open(MemoryKeyValueStore::new(), OsAccessibility::default()).await;
    let settings = store
        .update(SettingsPatch::new().speech_rate(9.0).speech_pitch(0.0))
        .await;
    assert_eq!(settings.speech_rate, 2.0);
    assert_eq!(settings.speech_pitch, 0.5);
}

#[tokio::test]
async fn test_empty_patch_changes_nothing() {
    let kv = MemoryKeyValueStore::new();
    let mut store = SettingsStore::open(kv.clone(), OsAccessibility::default()).await;
    let mut rx = store.subscribe();
    rx.borrow_and_update();

    let settings = store.update(SettingsPatch::new()).await;

    assert_eq!(settings, AccessibilitySettings::default());
    assert!(!rx.has_changed().unwrap());
    assert!(kv.raw(SETTINGS_KEY).is_none());
}

#[tokio::test]
async fn test_reset_restores_defaults_and_removes_key() {
    let kv = MemoryKeyValueStore::new();
    let mut store = SettingsStore::open(kv.clone(), OsAccessibility::default()).await;
    store
        .update(
            SettingsPatch::new()
                .high_contrast(true)
                .speech_rate(1.7)
                .font_size_tier(FontSizeTier::ExtraLarge),
        )
        .await;
    assert!(kv.raw(SETTINGS_KEY).is_some());

    let settings = store.reset().await;

    assert!(!settings.high_contrast);
    assert_eq!(settings.speech_rate, 0.8);
    assert_eq!(settings.font_size_tier, FontSizeTier::Medium);
    assert!(kv.raw(SETTINGS_KEY).is_none());
}

#[tokio::test]
async fn test_reset_keeps_os_fields() {
    let os = OsAccessibility {
        reduce_motion: true,
        bold_text: true,
        ..Default::default()
    };
    let mut store = SettingsStore::open(MemoryKeyValueStore::new(), os).await;
    let settings = store.reset().await;
    assert!(settings.reduce_motion);
    assert!(settings.bold_text);
}

#[tokio::test]
async fn test_storage_failures_are_swallowed() {
    let mut store = SettingsStore::open(BrokenStore, OsAccessibility::default()).await;
    assert_eq!(store.snapshot(), AccessibilitySettings::default());

    let settings = store.update(SettingsPatch::new().large_buttons(true)).await;
    assert!(settings.large_buttons);
    assert!(store.snapshot().large_buttons);

    let settings = store.reset().await;
    assert!(!settings.large_buttons);
}

#[tokio::test]
async fn test_corrupt_field_keeps_default() {
    let kv = MemoryKeyValueStore::new();
    kv.insert_raw(
        SETTINGS_KEY,
        r#"{"fontSizeTier":"huge","highContrast":true,"speechRate":"fast"}"#,
    );
    let store = SettingsStore::open(kv, OsAccessibility::default()).await;
    let settings = store.snapshot();
    assert_eq!(settings.font_size_tier, FontSizeTier::Medium);
    assert!(settings.high_contrast);
    assert_eq!(settings.speech_rate, 0.8);
}

#[tokio::test]
async fn test_screen_reader_edge_bumps_medium_once() {
    let mut store = SettingsStore::open(MemoryKeyValueStore::new(), OsAccessibility::default()).await;

    let settings = store.apply_os_signal(OsSignal::ScreenReaderChanged(true));
    assert!(settings.screen_reader_active);
    assert!(settings.large_buttons);
    assert!(settings.increased_spacing);
    assert_eq!(settings.font_size_tier, FontSizeTier::Large);

    // The user may undo the adjustment; a repeated signal must not redo it.
    store
        .update(
            SettingsPatch::new()
                .large_buttons(false)
                .font_size_tier(FontSizeTier::Medium),
        )
        .await;
    let settings = store.apply_os_signal(OsSignal::ScreenReaderChanged(true));
    assert!(!settings.large_buttons);
    assert_eq!(settings.font_size_tier, FontSizeTier::Medium);

    // An unrelated signal does not re-trigger it either.
    let settings = store.apply_os_signal(OsSignal::ReduceMotionChanged(true));
    assert_eq!(settings.font_size_tier, FontSizeTier::Medium);
    assert!(settings.reduce_motion);
}

#[tokio::test]
async fn test_screen_reader_edge_keeps_other_tiers() {
    let mut store = SettingsStore::open(MemoryKeyValueStore::new(), OsAccessibility::default()).await;
    store
        .update(SettingsPatch::new().font_size_tier(FontSizeTier::Small))
        .await;

    let settings = store.apply_os_signal(OsSignal::ScreenReaderChanged(true));
    assert_eq!(settings.font_size_tier, FontSizeTier::Small);
    assert!(settings.large_buttons);
}

#[tokio::test]
async fn test_screen_reader_off_keeps_adjustment() {
    let mut store = SettingsStore::open(MemoryKeyValueStore::new(), OsAccessibility::default()).await;
    store.apply_os_signal(OsSignal::ScreenReaderChanged(true));
    let settings = store.apply_os_signal(OsSignal::ScreenReaderChanged(false));
    assert!(!settings.screen_reader_active);
    assert!(settings.large_buttons);
    assert_eq!(settings.font_size_tier, FontSizeTier::Large);
}

#[tokio::test]
async fn test_os_bold_is_or_ed_with_user_choice() {
    let kv = MemoryKeyValueStore::new();
    let mut store = SettingsStore::open(kv.clone(), OsAccessibility::default()).await;

    let settings = store.apply_os_signal(OsSignal::BoldTextChanged(true));
    assert!(settings.bold_text);
    store.update(SettingsPatch::new().high_contrast(true)).await;
    assert!(!persisted(&kv).bold_text);

    let settings = store.apply_os_signal(OsSignal::BoldTextChanged(false));
    assert!(!settings.bold_text);

    store.update(SettingsPatch::new().bold_text(true)).await;
    let settings = store.apply_os_signal(OsSignal::BoldTextChanged(false));
    assert!(settings.bold_text);
    assert!(persisted(&kv).bold_text);
}
