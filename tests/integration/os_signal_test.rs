//! OS accessibility signals flowing into the settings store.

use std::sync::Arc;
use std::time::Duration;

use luminus::accessibility::resolver::{resolve_palette, resolve_touch_target};
use luminus::accessibility::{OsAccessibility, OsSignal, OsSignalBus, OsSignalSource};
use luminus::storage::{subscribe_to_os_signals, MemoryKeyValueStore};
use luminus::{AccessibilitySettings, FontSizeTier, SettingsStore};
use tokio::sync::{watch, Mutex};

/// Wait for the next published snapshot.
async fn next(rx: &mut watch::Receiver<AccessibilitySettings>) -> AccessibilitySettings {
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("snapshot published")
        .unwrap();
    *rx.borrow_and_update()
}

#[tokio::test]
async fn test_startup_with_screen_reader_active() {
    let bus = OsSignalBus::new(OsAccessibility {
        screen_reader_active: true,
        ..Default::default()
    });
    let store = SettingsStore::open(MemoryKeyValueStore::new(), bus.current()).await;
    let settings = store.snapshot();

    assert!(settings.screen_reader_active);
    assert!(settings.large_buttons);
    assert!(settings.increased_spacing);
    assert_eq!(settings.font_size_tier, FontSizeTier::Large);
    assert!(resolve_palette(&settings).is_high_contrast());
    assert!(resolve_touch_target(44.0, settings.large_buttons) >= 56.0);
}

#[tokio::test]
async fn test_bus_signals_reach_subscribers() {
    let bus = OsSignalBus::default();
    let store = SettingsStore::open(MemoryKeyValueStore::new(), bus.current()).await;
    let mut rx = store.subscribe();
    rx.borrow_and_update();
    let store = Arc::new(Mutex::new(store));

    let subscription = subscribe_to_os_signals(Arc::clone(&store), &bus);
    assert!(subscription.is_active());

    bus.emit(OsSignal::ReduceMotionChanged(true));
    let settings = next(&mut rx).await;
    assert!(settings.reduce_motion);

    bus.emit(OsSignal::ScreenReaderChanged(true));
    let settings = next(&mut rx).await;
    assert!(settings.screen_reader_active);
    assert_eq!(settings.font_size_tier, FontSizeTier::Large);
    assert_eq!(store.lock().await.snapshot(), settings);
}

#[tokio::test]
async fn test_unsubscribe_stops_delivery() {
    let bus = OsSignalBus::default();
    let store = SettingsStore::open(MemoryKeyValueStore::new(), bus.current()).await;
    let store = Arc::new(Mutex::new(store));

    let subscription = subscribe_to_os_signals(Arc::clone(&store), &bus);
    subscription.unsubscribe();
    tokio::task::yield_now().await;

    bus.emit(OsSignal::BoldTextChanged(true));
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(!store.lock().await.snapshot().bold_text);
    assert!(bus.current().bold_text);
}

#[tokio::test]
async fn test_duplicate_screen_reader_signal_keeps_user_choice() {
    let bus = OsSignalBus::default();
    let store = SettingsStore::open(MemoryKeyValueStore::new(), bus.current()).await;
    let mut rx = store.subscribe();
    rx.borrow_and_update();
    let store = Arc::new(Mutex::new(store));
    let _subscription = subscribe_to_os_signals(Arc::clone(&store), &bus);

    bus.emit(OsSignal::ScreenReaderChanged(true));
    next(&mut rx).await;

    store
        .lock()
        .await
        .update(luminus::SettingsPatch::new().font_size_tier(FontSizeTier::Medium))
        .await;
    next(&mut rx).await;

    // Re-announcing the same state is dropped by the bus.
    bus.emit(OsSignal::ScreenReaderChanged(true));
    bus.emit(OsSignal::BoldTextChanged(true));
    let settings = next(&mut rx).await;
    assert!(settings.bold_text);
    assert_eq!(settings.font_size_tier, FontSizeTier::Medium);
}
