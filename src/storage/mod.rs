//! Storage module for persisted settings and configuration.

pub mod config;
pub mod kv;
pub mod settings_store;

pub use config::{AppConfig, BackendSettings, ConfigError, FeedbackSettings, SpeechSettings};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError};
pub use settings_store::{
    subscribe_to_os_signals, OsSignalSubscription, SettingsStore, SETTINGS_KEY,
};
