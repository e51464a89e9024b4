//! Settings resolution: preferences in, concrete presentation values out.
//!
//! Every function here is pure. Screens call them on each frame with the
//! current snapshot, so the same inputs must always produce the same output.

use super::palette::Palette;
use super::settings::{
    sanitize_speech_value, AccessibilitySettings, FontSizeTier, DEFAULT_SPEECH_PITCH,
    DEFAULT_SPEECH_RATE,
};

/// Smallest touch target produced when large buttons are enabled.
pub const MIN_LARGE_TOUCH_TARGET: f32 = 56.0;

/// Spacing multiplier applied when increased spacing is enabled.
pub const SPACING_MULTIPLIER: f32 = 1.5;

/// Line height multipliers (normal / increased spacing).
pub const LINE_HEIGHT_NORMAL: f32 = 1.4;
pub const LINE_HEIGHT_INCREASED: f32 = 1.6;

/// Touch target growth applied when large buttons are enabled.
pub const TOUCH_TARGET_MULTIPLIER: f32 = 1.3;

/// CSS-style numeric font weight (100..=900).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(u16);

impl FontWeight {
    pub const LIGHT: FontWeight = FontWeight(300);
    pub const REGULAR: FontWeight = FontWeight(400);
    pub const MEDIUM: FontWeight = FontWeight(500);
    pub const SEMIBOLD: FontWeight = FontWeight(600);
    pub const BOLD: FontWeight = FontWeight(700);
    pub const EXTRA_BOLD: FontWeight = FontWeight(800);
    pub const BLACK: FontWeight = FontWeight(900);

    /// Build a weight, snapping to the nearest hundred within 100..=900.
    pub fn new(weight: u16) -> Self {
        let snapped = (weight.saturating_add(50) / 100) * 100;
        FontWeight(snapped.clamp(100, 900))
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    /// True for bold and heavier.
    pub fn is_bold(&self) -> bool {
        *self >= FontWeight::BOLD
    }
}

/// Direction for a group of buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutDirection {
    Row,
    Column,
}

/// Fully resolved text style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub weight: FontWeight,
    pub line_height: f32,
}

/// Parameters handed to the speech controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechParams {
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
    /// Sound gate at the time the parameters were resolved.
    pub enabled: bool,
}

/// Scale a base font size by the tier multiplier, rounded to whole points.
pub fn resolve_font_size(base_size: f32, tier: FontSizeTier) -> f32 {
    (base_size * tier.multiplier()).round()
}

pub fn resolve_line_height(base_size: f32, increased_spacing: bool) -> f32 {
    let factor = if increased_spacing {
        LINE_HEIGHT_INCREASED
    } else {
        LINE_HEIGHT_NORMAL
    };
    base_size * factor
}

pub fn resolve_spacing(base_value: f32, increased_spacing: bool) -> f32 {
    if increased_spacing {
        base_value * SPACING_MULTIPLIER
    } else {
        base_value
    }
}

/// Grow a touch target when large buttons are enabled, never below 56 points.
pub fn resolve_touch_target(base_size: f32, large_buttons: bool) -> f32 {
    if large_buttons {
        (base_size * TOUCH_TARGET_MULTIPLIER).max(MIN_LARGE_TOUCH_TARGET)
    } else {
        base_size
    }
}

/// Make a weight heavier when bold text is requested.
///
/// Anything lighter than bold jumps to bold; bold and heavier go one step
/// further (capped at black).
pub fn resolve_font_weight(base_weight: FontWeight, bold_text: bool) -> FontWeight {
    if !bold_text {
        return base_weight;
    }
    if base_weight < FontWeight::BOLD {
        FontWeight::BOLD
    } else {
        FontWeight::new(base_weight.value() + 100)
    }
}

/// High contrast is active when requested by the user OR a screen reader runs.
pub fn resolve_palette(settings: &AccessibilitySettings) -> &'static Palette {
    if settings.high_contrast || settings.screen_reader_active {
        &Palette::HIGH_CONTRAST
    } else {
        &Palette::NORMAL
    }
}

/// Enlarged buttons stack vertically to avoid horizontal crowding.
pub fn resolve_layout_direction(large_buttons: bool) -> LayoutDirection {
    if large_buttons {
        LayoutDirection::Column
    } else {
        LayoutDirection::Row
    }
}

pub fn clamp_speech_rate(rate: f32) -> f32 {
    sanitize_speech_value(rate, DEFAULT_SPEECH_RATE)
}

pub fn clamp_speech_pitch(pitch: f32) -> f32 {
    sanitize_speech_value(pitch, DEFAULT_SPEECH_PITCH)
}

/// Speech parameters for the current snapshot.
pub fn resolve_speech(settings: &AccessibilitySettings, language: &str) -> SpeechParams {
    SpeechParams {
        language: language.to_string(),
        rate: clamp_speech_rate(settings.speech_rate),
        pitch: clamp_speech_pitch(settings.speech_pitch),
        enabled: settings.sound_enabled,
    }
}

/// Body text style for a base size.
pub fn text_style(base_size: f32, settings: &AccessibilitySettings) -> TextStyle {
    TextStyle {
        size: resolve_font_size(base_size, settings.font_size_tier),
        weight: resolve_font_weight(FontWeight::REGULAR, settings.bold_text),
        line_height: resolve_line_height(base_size, settings.increased_spacing),
    }
}

/// Title style for a base size (bold by default, extra-bold with bold text).
pub fn title_style(base_size: f32, settings: &AccessibilitySettings) -> TextStyle {
    TextStyle {
        size: resolve_font_size(base_size, settings.font_size_tier),
        weight: resolve_font_weight(FontWeight::BOLD, settings.bold_text),
        line_height: resolve_line_height(base_size, settings.increased_spacing),
    }
}
