//! Mapping of resolved accessibility values onto egui styling.

use egui::{FontId, Layout, Stroke, Visuals};

use crate::accessibility::palette::Palette;
use crate::accessibility::resolver::{
    resolve_font_size, resolve_palette, resolve_spacing, resolve_touch_target, LayoutDirection,
};
use crate::accessibility::settings::AccessibilitySettings;

/// Base sizes before tier scaling.
pub mod sizes {
    pub const SMALL: f32 = 14.0;
    pub const BODY: f32 = 16.0;
    pub const BUTTON: f32 = 18.0;
    pub const HEADING: f32 = 28.0;
    pub const TITLE: f32 = 36.0;
}

/// Base spacing values before the increased-spacing multiplier.
pub mod spacing {
    pub const ITEM: f32 = 8.0;
    pub const BUTTON_PADDING_X: f32 = 16.0;
    pub const BUTTON_PADDING_Y: f32 = 12.0;
    pub const SECTION: f32 = 32.0;
    pub const SCREEN: f32 = 20.0;
}

/// Standard interactive element height.
pub const TOUCH_TARGET: f32 = 44.0;

/// egui visuals for a palette.
pub fn visuals(palette: &Palette) -> Visuals {
    let mut visuals = Visuals::dark();

    visuals.window_fill = palette.surface;
    visuals.panel_fill = palette.background;
    visuals.faint_bg_color = palette.surface;
    visuals.extreme_bg_color = palette.background;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.primary;
    visuals.error_fg_color = palette.error;
    visuals.warn_fg_color = palette.warning;

    visuals.widgets.noninteractive.bg_fill = palette.surface;
    visuals.widgets.inactive.bg_fill = palette.surface_elevated;
    visuals.widgets.inactive.weak_bg_fill = palette.surface_elevated;
    visuals.widgets.hovered.bg_fill = palette.surface_elevated;
    visuals.widgets.hovered.weak_bg_fill = palette.surface_elevated;
    visuals.widgets.active.bg_fill = palette.primary;
    visuals.widgets.active.weak_bg_fill = palette.primary;

    visuals.selection.bg_fill = palette.primary.linear_multiply(0.4);
    visuals.selection.stroke.color = palette.primary;

    visuals.widgets.noninteractive.fg_stroke.color = palette.text_primary;
    visuals.widgets.inactive.fg_stroke.color = palette.text_primary;
    visuals.widgets.hovered.fg_stroke.color = palette.text_primary;
    visuals.widgets.active.fg_stroke.color = palette.on_primary;

    let border_width = if palette.is_high_contrast() { 2.0 } else { 1.0 };
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(border_width, palette.border);
    visuals.widgets.inactive.bg_stroke = Stroke::new(border_width, palette.border);
    visuals.widgets.hovered.bg_stroke = Stroke::new(border_width + 1.0, palette.border_focus);
    visuals.widgets.active.bg_stroke = Stroke::new(border_width + 1.0, palette.border_focus);

    visuals
}

/// Re-style the whole context from a settings snapshot.
pub fn apply_presentation(ctx: &egui::Context, settings: &AccessibilitySettings) {
    ctx.set_visuals(visuals(resolve_palette(settings)));

    let tier = settings.font_size_tier;
    let increased = settings.increased_spacing;
    let target = resolve_touch_target(TOUCH_TARGET, settings.large_buttons);

    ctx.style_mut(|style| {
        use egui::TextStyle as Egui;

        style.text_styles = [
            (Egui::Small, FontId::proportional(resolve_font_size(sizes::SMALL, tier))),
            (Egui::Body, FontId::proportional(resolve_font_size(sizes::BODY, tier))),
            (Egui::Button, FontId::proportional(resolve_font_size(sizes::BUTTON, tier))),
            (Egui::Heading, FontId::proportional(resolve_font_size(sizes::HEADING, tier))),
            (Egui::Monospace, FontId::monospace(resolve_font_size(sizes::BODY, tier))),
        ]
        .into();

        let item = resolve_spacing(spacing::ITEM, increased);
        style.spacing.item_spacing = egui::vec2(item, item);
        style.spacing.button_padding = egui::vec2(
            resolve_spacing(spacing::BUTTON_PADDING_X, increased),
            resolve_spacing(spacing::BUTTON_PADDING_Y, increased),
        );
        style.spacing.interact_size.y = target;

        style.animation_time = if settings.reduce_motion { 0.0 } else { 1.0 / 12.0 };
    });
}

/// Layout for a group of buttons.
pub fn layout_for(direction: LayoutDirection) -> Layout {
    match direction {
        LayoutDirection::Row => Layout::left_to_right(egui::Align::Center).with_main_wrap(true),
        LayoutDirection::Column => Layout::top_down_justified(egui::Align::Min),
    }
}
