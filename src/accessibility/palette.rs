//! Color palettes for normal and high-contrast presentation.
//!
//! The normal palette is tuned for low vision on a dark background; the
//! high-contrast palette swaps to pure black surfaces with yellow primary
//! text for 7:1 (WCAG AAA) contrast.

use egui::Color32;

/// Which palette is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteKind {
    Normal,
    HighContrast,
}

/// Resolved set of colors for one presentation mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub kind: PaletteKind,
    // Surfaces
    pub background: Color32,
    pub surface: Color32,
    pub surface_elevated: Color32,
    // Text
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_tertiary: Color32,
    pub text_disabled: Color32,
    // Interaction
    pub primary: Color32,
    pub on_primary: Color32,
    pub border: Color32,
    pub border_focus: Color32,
    // Status
    pub success: Color32,
    pub error: Color32,
    pub warning: Color32,
    pub info: Color32,
}

impl Palette {
    /// Default palette: softened black with amber accents.
    pub const NORMAL: Palette = Palette {
        kind: PaletteKind::Normal,
        background: Color32::from_rgb(0x1A, 0x1A, 0x1A),
        surface: Color32::from_rgb(0x2D, 0x2D, 0x2D),
        surface_elevated: Color32::from_rgb(0x40, 0x40, 0x40),
        text_primary: Color32::from_rgb(0xFF, 0xFF, 0xFF),
        text_secondary: Color32::from_rgb(0xE0, 0xE0, 0xE0),
        text_tertiary: Color32::from_rgb(0xB0, 0xB0, 0xB0),
        text_disabled: Color32::from_rgb(0x80, 0x80, 0x80),
        primary: Color32::from_rgb(0xFF, 0xB8, 0x00),
        on_primary: Color32::from_rgb(0x00, 0x00, 0x00),
        border: Color32::from_rgb(0x80, 0x80, 0x80),
        border_focus: Color32::from_rgb(0xFF, 0xB8, 0x00),
        success: Color32::from_rgb(0x00, 0xE6, 0x76),
        error: Color32::from_rgb(0xFF, 0x52, 0x52),
        warning: Color32::from_rgb(0xFF, 0xB7, 0x4D),
        info: Color32::from_rgb(0x29, 0xB6, 0xF6),
    };

    /// High-contrast palette: pure black surfaces, yellow primary text.
    pub const HIGH_CONTRAST: Palette = Palette {
        kind: PaletteKind::HighContrast,
        background: Color32::from_rgb(0x00, 0x00, 0x00),
        surface: Color32::from_rgb(0x00, 0x00, 0x00),
        surface_elevated: Color32::from_rgb(0x33, 0x33, 0x33),
        text_primary: Color32::from_rgb(0xFF, 0xFF, 0x00),
        text_secondary: Color32::from_rgb(0xFF, 0xFF, 0xFF),
        text_tertiary: Color32::from_rgb(0xCC, 0xCC, 0xCC),
        text_disabled: Color32::from_rgb(0x88, 0x88, 0x88),
        primary: Color32::from_rgb(0xFF, 0xB8, 0x00),
        on_primary: Color32::from_rgb(0x00, 0x00, 0x00),
        border: Color32::from_rgb(0xFF, 0xFF, 0xFF),
        border_focus: Color32::from_rgb(0xFF, 0xFF, 0x00),
        success: Color32::from_rgb(0x00, 0xE6, 0x76),
        error: Color32::from_rgb(0xFF, 0x52, 0x52),
        warning: Color32::from_rgb(0xFF, 0xB7, 0x4D),
        info: Color32::from_rgb(0x29, 0xB6, 0xF6),
    };

    pub fn is_high_contrast(&self) -> bool {
        self.kind == PaletteKind::HighContrast
    }
}

/// Calculate contrast ratio between two colors.
/// Returns a value between 1 and 21 (21 being black on white).
pub fn contrast_ratio(fg: Color32, bg: Color32) -> f32 {
    let fg_lum = relative_luminance(fg);
    let bg_lum = relative_luminance(bg);

    let (lighter, darker) = if fg_lum > bg_lum {
        (fg_lum, bg_lum)
    } else {
        (bg_lum, fg_lum)
    };

    (lighter + 0.05) / (darker + 0.05)
}

/// https://www.w3.org/TR/WCAG21/#dfn-relative-luminance
fn relative_luminance(color: Color32) -> f32 {
    let r = linearize(color.r() as f32 / 255.0);
    let g = linearize(color.g() as f32 / 255.0);
    let b = linearize(color.b() as f32 / 255.0);

    0.2126 * r + 0.7152 * g + 0.0722 * b
}

fn linearize(value: f32) -> f32 {
    if value <= 0.03928 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG AA for normal text (4.5:1).
pub fn meets_aa(fg: Color32, bg: Color32) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

/// WCAG AAA for normal text (7:1).
pub fn meets_aaa(fg: Color32, bg: Color32) -> bool {
    contrast_ratio(fg, bg) >= 7.0
}
