//! Accessibility preferences and their persisted form.
//!
//! `AccessibilitySettings` is the process-wide snapshot handed to every
//! consumer by value. Only the Settings Store mutates it; everybody else
//! works on copies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lowest accepted speech rate/pitch multiplier.
pub const SPEECH_MIN: f32 = 0.5;
/// Highest accepted speech rate/pitch multiplier.
pub const SPEECH_MAX: f32 = 2.0;
/// Default speech rate (slightly slower than the engine's normal rate).
pub const DEFAULT_SPEECH_RATE: f32 = 0.8;
/// Default speech pitch.
pub const DEFAULT_SPEECH_PITCH: f32 = 1.0;

/// Font size preference tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSizeTier {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
}

impl FontSizeTier {
    /// All tiers, smallest first.
    pub const ALL: [FontSizeTier; 4] = [
        FontSizeTier::Small,
        FontSizeTier::Medium,
        FontSizeTier::Large,
        FontSizeTier::ExtraLarge,
    ];

    /// Multiplier applied to every base font size.
    pub fn multiplier(&self) -> f32 {
        match self {
            FontSizeTier::Small => 0.9,
            FontSizeTier::Medium => 1.0,
            FontSizeTier::Large => 1.2,
            FontSizeTier::ExtraLarge => 1.5,
        }
    }

    /// The next larger tier (saturates at extra-large).
    pub fn step_up(&self) -> FontSizeTier {
        match self {
            FontSizeTier::Small => FontSizeTier::Medium,
            FontSizeTier::Medium => FontSizeTier::Large,
            FontSizeTier::Large | FontSizeTier::ExtraLarge => FontSizeTier::ExtraLarge,
        }
    }
}

impl std::fmt::Display for FontSizeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontSizeTier::Small => write!(f, "Small"),
            FontSizeTier::Medium => write!(f, "Medium"),
            FontSizeTier::Large => write!(f, "Large"),
            FontSizeTier::ExtraLarge => write!(f, "Extra large"),
        }
    }
}

/// Snapshot of every accessibility preference.
///
/// `reduce_motion` and `screen_reader_active` come from the operating system
/// and are never persisted. `bold_text` is the effective value: the user's
/// choice OR the OS bold-text signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccessibilitySettings {
    pub font_size_tier: FontSizeTier,
    pub high_contrast: bool,
    pub bold_text: bool,
    pub large_buttons: bool,
    pub increased_spacing: bool,
    pub sound_enabled: bool,
    pub haptic_feedback: bool,
    pub speech_rate: f32,
    pub speech_pitch: f32,
    pub reduce_motion: bool,
    pub screen_reader_active: bool,
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self {
            font_size_tier: FontSizeTier::Medium,
            high_contrast: false,
            bold_text: false,
            large_buttons: false,
            increased_spacing: false,
            sound_enabled: true,
            haptic_feedback: true,
            speech_rate: DEFAULT_SPEECH_RATE,
            speech_pitch: DEFAULT_SPEECH_PITCH,
            reduce_motion: false,
            screen_reader_active: false,
        }
    }
}

impl AccessibilitySettings {
    /// Apply a partial update to the user-controlled fields.
    ///
    /// Rate and pitch are clamped into their domain. `bold_text` is written
    /// verbatim; the store recombines it with the OS signal afterwards.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(tier) = patch.font_size_tier {
            self.font_size_tier = tier;
        }
        if let Some(v) = patch.high_contrast {
            self.high_contrast = v;
        }
        if let Some(v) = patch.bold_text {
            self.bold_text = v;
        }
        if let Some(v) = patch.large_buttons {
            self.large_buttons = v;
        }
        if let Some(v) = patch.increased_spacing {
            self.increased_spacing = v;
        }
        if let Some(v) = patch.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(v) = patch.haptic_feedback {
            self.haptic_feedback = v;
        }
        if let Some(rate) = patch.speech_rate {
            self.speech_rate = sanitize_speech_value(rate, DEFAULT_SPEECH_RATE);
        }
        if let Some(pitch) = patch.speech_pitch {
            self.speech_pitch = sanitize_speech_value(pitch, DEFAULT_SPEECH_PITCH);
        }
    }
}

/// Partial update of the user-controlled preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SettingsPatch {
    pub font_size_tier: Option<FontSizeTier>,
    pub high_contrast: Option<bool>,
    pub bold_text: Option<bool>,
    pub large_buttons: Option<bool>,
    pub increased_spacing: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub haptic_feedback: Option<bool>,
    pub speech_rate: Option<f32>,
    pub speech_pitch: Option<f32>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font_size_tier(mut self, tier: FontSizeTier) -> Self {
        self.font_size_tier = Some(tier);
        self
    }

    pub fn high_contrast(mut self, enabled: bool) -> Self {
        self.high_contrast = Some(enabled);
        self
    }

    pub fn bold_text(mut self, enabled: bool) -> Self {
        self.bold_text = Some(enabled);
        self
    }

    pub fn large_buttons(mut self, enabled: bool) -> Self {
        self.large_buttons = Some(enabled);
        self
    }

    pub fn increased_spacing(mut self, enabled: bool) -> Self {
        self.increased_spacing = Some(enabled);
        self
    }

    pub fn sound_enabled(mut self, enabled: bool) -> Self {
        self.sound_enabled = Some(enabled);
        self
    }

    pub fn haptic_feedback(mut self, enabled: bool) -> Self {
        self.haptic_feedback = Some(enabled);
        self
    }

    pub fn speech_rate(mut self, rate: f32) -> Self {
        self.speech_rate = Some(rate);
        self
    }

    pub fn speech_pitch(mut self, pitch: f32) -> Self {
        self.speech_pitch = Some(pitch);
        self
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The user-controlled subset of the settings, as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSettings {
    pub font_size_tier: FontSizeTier,
    pub high_contrast: bool,
    pub bold_text: bool,
    pub large_buttons: bool,
    pub increased_spacing: bool,
    pub sound_enabled: bool,
    pub haptic_feedback: bool,
    pub speech_rate: f32,
    pub speech_pitch: f32,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        let defaults = AccessibilitySettings::default();
        Self {
            font_size_tier: defaults.font_size_tier,
            high_contrast: defaults.high_contrast,
            bold_text: defaults.bold_text,
            large_buttons: defaults.large_buttons,
            increased_spacing: defaults.increased_spacing,
            sound_enabled: defaults.sound_enabled,
            haptic_feedback: defaults.haptic_feedback,
            speech_rate: defaults.speech_rate,
            speech_pitch: defaults.speech_pitch,
        }
    }
}

impl PersistedSettings {
    /// Decode a persisted blob field by field.
    ///
    /// Missing or malformed fields keep their defaults so that a blob written
    /// by an older build (or partially corrupted) still loads. Only a blob
    /// that is not a JSON object at all is rejected.
    pub fn from_json_lenient(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = value else {
            return Err(serde::de::Error::custom("settings blob is not a JSON object"));
        };

        let mut settings = Self::default();
        read_field(&map, "fontSizeTier", &mut settings.font_size_tier);
        read_field(&map, "highContrast", &mut settings.high_contrast);
        read_field(&map, "boldText", &mut settings.bold_text);
        read_field(&map, "largeButtons", &mut settings.large_buttons);
        read_field(&map, "increasedSpacing", &mut settings.increased_spacing);
        read_field(&map, "soundEnabled", &mut settings.sound_enabled);
        read_field(&map, "hapticFeedback", &mut settings.haptic_feedback);
        read_field(&map, "speechRate", &mut settings.speech_rate);
        read_field(&map, "speechPitch", &mut settings.speech_pitch);

        settings.speech_rate = sanitize_speech_value(settings.speech_rate, DEFAULT_SPEECH_RATE);
        settings.speech_pitch = sanitize_speech_value(settings.speech_pitch, DEFAULT_SPEECH_PITCH);

        Ok(settings)
    }

    /// Extract the user-controlled subset from a snapshot.
    ///
    /// `user_bold_text` replaces the snapshot's effective bold flag, which
    /// may be forced by the OS.
    pub fn from_snapshot(settings: &AccessibilitySettings, user_bold_text: bool) -> Self {
        Self {
            font_size_tier: settings.font_size_tier,
            high_contrast: settings.high_contrast,
            bold_text: user_bold_text,
            large_buttons: settings.large_buttons,
            increased_spacing: settings.increased_spacing,
            sound_enabled: settings.sound_enabled,
            haptic_feedback: settings.haptic_feedback,
            speech_rate: settings.speech_rate,
            speech_pitch: settings.speech_pitch,
        }
    }

    /// Write these user preferences into a snapshot.
    pub fn apply_to(&self, settings: &mut AccessibilitySettings) {
        settings.font_size_tier = self.font_size_tier;
        settings.high_contrast = self.high_contrast;
        settings.bold_text = self.bold_text;
        settings.large_buttons = self.large_buttons;
        settings.increased_spacing = self.increased_spacing;
        settings.sound_enabled = self.sound_enabled;
        settings.haptic_feedback = self.haptic_feedback;
        settings.speech_rate = self.speech_rate;
        settings.speech_pitch = self.speech_pitch;
    }
}

fn read_field<T: serde::de::DeserializeOwned>(map: &Map<String, Value>, key: &str, slot: &mut T) {
    let Some(raw) = map.get(key) else {
        return;
    };
    match T::deserialize(raw) {
        Ok(value) => *slot = value,
        Err(e) => tracing::warn!("Ignoring invalid persisted setting {}: {}", key, e),
    }
}

/// Clamp a rate/pitch multiplier into [0.5, 2.0]; non-finite values fall
/// back to `default`.
pub fn sanitize_speech_value(value: f32, default: f32) -> f32 {
    if value.is_finite() {
        value.clamp(SPEECH_MIN, SPEECH_MAX)
    } else {
        default
    }
}
