//! Settings persistence across application restarts.

use luminus::accessibility::OsAccessibility;
use luminus::storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, SETTINGS_KEY};
use luminus::{AccessibilitySettings, FontSizeTier, SettingsPatch, SettingsStore};

fn patch() -> SettingsPatch {
    SettingsPatch::new()
        .font_size_tier(FontSizeTier::ExtraLarge)
        .high_contrast(true)
        .bold_text(true)
        .haptic_feedback(false)
        .speech_rate(1.25)
        .speech_pitch(0.75)
}

fn assert_user_fields(settings: &AccessibilitySettings) {
    assert_eq!(settings.font_size_tier, FontSizeTier::ExtraLarge);
    assert!(settings.high_contrast);
    assert!(settings.bold_text);
    assert!(!settings.haptic_feedback);
    assert!(settings.sound_enabled);
    assert_eq!(settings.speech_rate, 1.25);
    assert_eq!(settings.speech_pitch, 0.75);
}

#[tokio::test]
async fn test_round_trip_after_restart_in_memory() {
    let kv = MemoryKeyValueStore::new();
    {
        let mut store = SettingsStore::open(kv.clone(), OsAccessibility::default()).await;
        store.update(patch()).await;
    }

    let store = SettingsStore::open(kv, OsAccessibility::default()).await;
    assert_user_fields(&store.snapshot());
}

#[tokio::test]
async fn test_round_trip_after_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store =
            SettingsStore::open(FileKeyValueStore::new(dir.path()), OsAccessibility::default())
                .await;
        store.update(patch()).await;
    }

    let store =
        SettingsStore::open(FileKeyValueStore::new(dir.path()), OsAccessibility::default()).await;
    assert_user_fields(&store.snapshot());
}

#[tokio::test]
async fn test_persisted_blob_uses_camel_case_keys() {
    let kv = MemoryKeyValueStore::new();
    let mut store = SettingsStore::open(kv.clone(), OsAccessibility::default()).await;
    store.update(patch()).await;

    let raw = kv.get(SETTINGS_KEY).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["fontSizeTier"], "extra-large");
    assert_eq!(value["highContrast"], true);
    assert_eq!(value["speechRate"], 1.25);
    assert!(value.get("screenReaderActive").is_none());
    assert!(value.get("reduceMotion").is_none());
}

#[tokio::test]
async fn test_reset_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store =
            SettingsStore::open(FileKeyValueStore::new(dir.path()), OsAccessibility::default())
                .await;
        store.update(patch()).await;
        store.reset().await;
    }

    let store =
        SettingsStore::open(FileKeyValueStore::new(dir.path()), OsAccessibility::default()).await;
    assert_eq!(store.snapshot(), AccessibilitySettings::default());
    assert!(FileKeyValueStore::new(dir.path())
        .get(SETTINGS_KEY)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_os_bold_not_persisted_as_user_choice() {
    let kv = MemoryKeyValueStore::new();
    let os = OsAccessibility {
        bold_text: true,
        ..Default::default()
    };
    {
        let mut store = SettingsStore::open(kv.clone(), os).await;
        assert!(store.snapshot().bold_text);
        store.update(SettingsPatch::new().high_contrast(true)).await;
    }

    let store = SettingsStore::open(kv, OsAccessibility::default()).await;
    assert!(!store.snapshot().bold_text);
    assert!(store.snapshot().high_contrast);
}
