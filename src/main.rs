//! Luminus - accessibility assistant
//!
//! Main entry point for the desktop shell.

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use luminus::accessibility::{OsSignalBus, OsSignalSource};
use luminus::storage::config::{self, AppConfig};
use luminus::storage::{subscribe_to_os_signals, FileKeyValueStore, SettingsStore};

mod app;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Luminus v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load_config().unwrap_or_else(|e| {
        tracing::warn!("Using default configuration: {}", e);
        AppConfig {
            data_dir: config::get_data_dir(),
            ..Default::default()
        }
    });

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    // The desktop shell reports screen-reader changes from egui each frame.
    let os_signals = Arc::new(OsSignalBus::default());

    let storage = FileKeyValueStore::new(config.settings_dir());
    let store = runtime.block_on(SettingsStore::open(storage, os_signals.current()));
    let settings_rx = store.subscribe();
    let store = Arc::new(Mutex::new(store));

    let os_subscription = {
        let _guard = runtime.enter();
        subscribe_to_os_signals(Arc::clone(&store), os_signals.as_ref())
    };

    let services = app::AppServices {
        runtime: runtime.handle().clone(),
        config,
        store,
        settings_rx,
        os_signals,
        os_subscription,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 900.0])
            .with_min_inner_size([360.0, 480.0])
            .with_title("Luminus"),
        ..Default::default()
    };

    eframe::run_native(
        "Luminus",
        options,
        Box::new(move |cc| Ok(Box::new(app::LuminusApp::new(cc, services)))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))?;

    tracing::info!("Luminus stopped");
    Ok(())
}
