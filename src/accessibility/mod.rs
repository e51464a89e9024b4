//! Accessibility preferences and their resolution into presentation values.
//!
//! This module provides:
//! - The settings snapshot and its persisted form
//! - Pure resolver functions (font size, spacing, touch targets, palette)
//! - Normal and high-contrast palettes
//! - OS accessibility signals (screen reader, bold text, reduce motion)
//! - Screen reader announcements

pub mod os_signals;
pub mod palette;
pub mod resolver;
pub mod screen_reader;
pub mod settings;

// Re-export primary types
pub use os_signals::{OsAccessibility, OsSignal, OsSignalBus, OsSignalSource};
pub use palette::{Palette, PaletteKind};
pub use resolver::{
    resolve_font_size, resolve_font_weight, resolve_layout_direction, resolve_line_height,
    resolve_palette, resolve_spacing, resolve_speech, resolve_touch_target, FontWeight,
    LayoutDirection, SpeechParams, TextStyle,
};
pub use screen_reader::{Announcement, Announcer, Politeness};
pub use settings::{AccessibilitySettings, FontSizeTier, PersistedSettings, SettingsPatch};
