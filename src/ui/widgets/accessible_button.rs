//! Accessible button widget.
//!
//! Size, font and colors come from the resolver, so the button follows the
//! user's large-button, font-size, bold-text and contrast preferences.

use egui::{Color32, FontId, Response, Sense, StrokeKind, Ui, Vec2, Widget};

use crate::accessibility::palette::Palette;
use crate::accessibility::resolver::{
    resolve_font_size, resolve_font_weight, resolve_palette, resolve_spacing,
    resolve_touch_target, FontWeight,
};
use crate::accessibility::settings::AccessibilitySettings;
use crate::ui::theme::{sizes, spacing, TOUCH_TARGET};

/// Visual role of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Danger,
}

/// Resolved appearance of an accessible button.
#[derive(Debug, Clone)]
pub struct AccessibleButtonStyle {
    /// Minimum size for touch targets
    pub min_size: Vec2,
    pub padding: Vec2,
    pub bg_color: Color32,
    pub bg_hover: Color32,
    pub bg_pressed: Color32,
    pub text_color: Color32,
    pub border: Color32,
    pub focus: Color32,
    pub font_size: f32,
    pub weight: FontWeight,
    pub rounding: f32,
}

impl AccessibleButtonStyle {
    /// Style for `variant` under the given settings.
    pub fn resolve(variant: ButtonVariant, settings: &AccessibilitySettings) -> Self {
        let palette = resolve_palette(settings);
        let target = resolve_touch_target(TOUCH_TARGET, settings.large_buttons);
        let (bg_color, text_color) = colors(variant, palette);

        Self {
            min_size: Vec2::splat(target),
            padding: Vec2::new(
                resolve_spacing(spacing::BUTTON_PADDING_X, settings.increased_spacing),
                resolve_spacing(spacing::BUTTON_PADDING_Y, settings.increased_spacing),
            ),
            bg_color,
            bg_hover: bg_color.gamma_multiply(0.85),
            bg_pressed: bg_color.gamma_multiply(0.7),
            text_color,
            border: palette.border,
            focus: palette.border_focus,
            font_size: resolve_font_size(sizes::BUTTON, settings.font_size_tier),
            weight: resolve_font_weight(FontWeight::SEMIBOLD, settings.bold_text),
            rounding: 8.0,
        }
    }
}

fn colors(variant: ButtonVariant, palette: &Palette) -> (Color32, Color32) {
    match variant {
        ButtonVariant::Primary => (palette.primary, palette.on_primary),
        ButtonVariant::Secondary => (palette.surface_elevated, palette.text_primary),
        ButtonVariant::Danger => (palette.error, palette.on_primary),
    }
}

/// A button whose touch target never shrinks below the resolved minimum.
pub struct AccessibleButton<'a> {
    /// Button text
    text: &'a str,
    /// Accessible label for screen readers (if different from text)
    accessible_label: Option<&'a str>,
    style: AccessibleButtonStyle,
    enabled: bool,
    /// Stretch to the available width
    full_width: bool,
}

impl<'a> AccessibleButton<'a> {
    pub fn new(text: &'a str, settings: &AccessibilitySettings) -> Self {
        Self {
            text,
            accessible_label: None,
            style: AccessibleButtonStyle::resolve(ButtonVariant::Primary, settings),
            enabled: true,
            full_width: false,
        }
    }

    pub fn variant(mut self, variant: ButtonVariant, settings: &AccessibilitySettings) -> Self {
        self.style = AccessibleButtonStyle::resolve(variant, settings);
        self
    }

    /// Set the accessible label for screen readers.
    pub fn accessible_label(mut self, label: &'a str) -> Self {
        self.accessible_label = Some(label);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn full_width(mut self, full_width: bool) -> Self {
        self.full_width = full_width;
        self
    }
}

impl Widget for AccessibleButton<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let Self {
            text,
            accessible_label,
            style,
            enabled,
            full_width,
        } = self;

        let font = FontId::proportional(style.font_size);
        let text_size = ui
            .painter()
            .layout_no_wrap(text.to_string(), font.clone(), style.text_color)
            .size();

        let content = text_size + style.padding * 2.0;
        let width = if full_width {
            ui.available_width().max(style.min_size.x)
        } else {
            content.x.max(style.min_size.x)
        };
        let size = Vec2::new(width, content.y.max(style.min_size.y));

        let sense = if enabled { Sense::click() } else { Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(size, sense);

        let label = accessible_label.unwrap_or(text);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, label)
        });

        if ui.is_rect_visible(rect) {
            let bg_color = if !enabled {
                style.bg_color.gamma_multiply(0.5)
            } else if response.is_pointer_button_down_on() {
                style.bg_pressed
            } else if response.hovered() {
                style.bg_hover
            } else {
                style.bg_color
            };

            ui.painter().rect_filled(rect, style.rounding, bg_color);
            ui.painter().rect_stroke(
                rect,
                style.rounding,
                egui::Stroke::new(1.0, style.border),
                StrokeKind::Inside,
            );

            if response.has_focus() {
                ui.painter().rect_stroke(
                    rect,
                    style.rounding,
                    egui::Stroke::new(3.0, style.focus),
                    StrokeKind::Outside,
                );
            }

            let text_color = if enabled {
                style.text_color
            } else {
                style.text_color.gamma_multiply(0.5)
            };

            // egui has a single weight per family; heavier weights are drawn twice.
            let offsets: &[f32] = if style.weight.is_bold() { &[0.0, 0.7] } else { &[0.0] };
            for dx in offsets {
                ui.painter().text(
                    rect.center() + Vec2::new(*dx, 0.0),
                    egui::Align2::CENTER_CENTER,
                    text,
                    font.clone(),
                    text_color,
                );
            }
        }

        response.on_hover_text(label)
    }
}
