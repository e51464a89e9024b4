//! Luminus - accessibility assistant core
//!
//! Settings persistence and resolution, timed haptic/tone feedback, speech
//! output and the backend client behind an assistant for blind and
//! low-vision users, with an egui desktop shell.

pub mod accessibility;
pub mod api;
pub mod audio;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use accessibility::{AccessibilitySettings, FontSizeTier, SettingsPatch};
pub use audio::{FeedbackEvent, FeedbackSequencer, SpeechController};
pub use storage::settings_store::SettingsStore;
