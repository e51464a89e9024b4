//! Unit tests for the settings resolver.

use luminus::accessibility::resolver::{
    clamp_speech_pitch, clamp_speech_rate, resolve_font_size, resolve_font_weight,
    resolve_layout_direction, resolve_line_height, resolve_palette, resolve_spacing,
    resolve_speech, resolve_touch_target, text_style, title_style, FontWeight, LayoutDirection,
};
use luminus::{AccessibilitySettings, FontSizeTier};

#[test]
fn test_font_size_reference_values() {
    assert_eq!(resolve_font_size(16.0, FontSizeTier::Medium), 16.0);
    assert_eq!(resolve_font_size(16.0, FontSizeTier::ExtraLarge), 24.0);
    assert_eq!(resolve_font_size(16.0, FontSizeTier::Large), 19.0);
    assert_eq!(resolve_font_size(16.0, FontSizeTier::Small), 14.0);
}

/// Larger tiers never produce smaller text.
#[test]
fn test_font_size_monotonic_by_tier() {
    for base in [10.0, 12.0, 14.0, 16.0, 18.0, 28.0, 36.0, 48.0] {
        let sizes: Vec<f32> = FontSizeTier::ALL
            .iter()
            .map(|tier| resolve_font_size(base, *tier))
            .collect();
        for pair in sizes.windows(2) {
            assert!(pair[0] <= pair[1], "base {base}: {:?}", sizes);
        }
    }
}

#[test]
fn test_touch_target_floor() {
    for base in [0.0, 20.0, 32.0, 40.0, 44.0, 60.0] {
        assert!(resolve_touch_target(base, true) >= 56.0);
        assert_eq!(resolve_touch_target(base, false), base);
    }
    assert!((resolve_touch_target(60.0, true) - 78.0).abs() < 1e-3);
}

#[test]
fn test_spacing_and_line_height() {
    assert_eq!(resolve_spacing(8.0, false), 8.0);
    assert_eq!(resolve_spacing(8.0, true), 12.0);
    assert!((resolve_line_height(10.0, false) - 14.0).abs() < 1e-4);
    assert!((resolve_line_height(10.0, true) - 16.0).abs() < 1e-4);
}

#[test]
fn test_font_weight() {
    assert_eq!(resolve_font_weight(FontWeight::REGULAR, false), FontWeight::REGULAR);
    assert_eq!(resolve_font_weight(FontWeight::REGULAR, true), FontWeight::BOLD);
    assert_eq!(
        resolve_font_weight(FontWeight::BOLD, true).value(),
        FontWeight::BOLD.value() + 100
    );
    assert_eq!(resolve_font_weight(FontWeight::new(900), true).value(), 900);
}

/// High contrast is on exactly when the user asked for it or a screen reader runs.
#[test]
fn test_palette_or_law() {
    for high_contrast in [false, true] {
        for screen_reader_active in [false, true] {
            let settings = AccessibilitySettings {
                high_contrast,
                screen_reader_active,
                ..Default::default()
            };
            assert_eq!(
                resolve_palette(&settings).is_high_contrast(),
                high_contrast || screen_reader_active
            );
        }
    }
}

#[test]
fn test_layout_direction() {
    assert_eq!(resolve_layout_direction(true), LayoutDirection::Column);
    assert_eq!(resolve_layout_direction(false), LayoutDirection::Row);
}

#[test]
fn test_speech_clamping() {
    assert_eq!(clamp_speech_rate(0.1), 0.5);
    assert_eq!(clamp_speech_rate(3.0), 2.0);
    assert_eq!(clamp_speech_rate(f32::NAN), 0.8);
    assert_eq!(clamp_speech_pitch(f32::INFINITY), 1.0);
    assert_eq!(clamp_speech_pitch(1.3), 1.3);
}

#[test]
fn test_resolve_speech_follows_sound_gate() {
    let settings = AccessibilitySettings {
        sound_enabled: false,
        speech_rate: 1.5,
        ..Default::default()
    };
    let params = resolve_speech(&settings, "pt-BR");
    assert_eq!(params.language, "pt-BR");
    assert_eq!(params.rate, 1.5);
    assert_eq!(params.pitch, 1.0);
    assert!(!params.enabled);
}

#[test]
fn test_text_styles() {
    let settings = AccessibilitySettings {
        font_size_tier: FontSizeTier::ExtraLarge,
        bold_text: true,
        ..Default::default()
    };
    let body = text_style(16.0, &settings);
    assert_eq!(body.size, 24.0);
    assert_eq!(body.weight, FontWeight::BOLD);

    let title = title_style(16.0, &settings);
    assert!(title.weight > body.weight);
}
