//! Accessibility settings screen.
//!
//! Renders every preference with resolver output and reports user intent as
//! [`SettingsAction`]s. The screen never mutates settings itself; the shell
//! routes actions to the settings store and re-renders from its snapshot.

use egui::{RichText, ScrollArea, Ui};

use crate::accessibility::resolver::{
    resolve_layout_direction, resolve_palette, resolve_spacing, text_style, title_style,
    TextStyle,
};
use crate::accessibility::settings::{
    AccessibilitySettings, FontSizeTier, SettingsPatch, SPEECH_MAX, SPEECH_MIN,
};
use crate::audio::feedback::FeedbackEvent;
use crate::ui::theme::{layout_for, sizes, spacing};
use crate::ui::widgets::{AccessibleButton, ButtonVariant};

/// Phrase spoken by the speech preview button.
pub const PREVIEW_PHRASE: &str = "Esta é a velocidade e o tom da sua voz de leitura.";

/// Intent reported by the settings screen.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    /// Apply a partial update
    Update(SettingsPatch),
    /// Restore defaults
    Reset,
    /// Speak a sample phrase with the current voice settings
    PreviewSpeech,
    /// Play a feedback pattern
    PreviewFeedback(FeedbackEvent),
}

/// Settings screen state.
#[derive(Debug, Default)]
pub struct SettingsScreen {
    /// Waiting for the user to confirm a reset
    confirm_reset: bool,
}

impl SettingsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the settings screen.
    pub fn show(&mut self, ui: &mut Ui, settings: &AccessibilitySettings) -> Vec<SettingsAction> {
        let mut actions = Vec::new();

        ui.label(styled("Acessibilidade", title_style(sizes::TITLE, settings)));
        ui.label(styled(
            "Ajuste o aplicativo às suas necessidades.",
            text_style(sizes::BODY, settings),
        ));

        ui.separator();

        ScrollArea::vertical().show(ui, |ui| {
            ui.set_min_width(ui.available_width());

            let gap = resolve_spacing(spacing::SECTION, settings.increased_spacing);

            self.render_text_section(ui, settings, &mut actions);
            ui.add_space(gap);

            self.render_visual_section(ui, settings, &mut actions);
            ui.add_space(gap);

            self.render_audio_section(ui, settings, &mut actions);
            ui.add_space(gap);

            self.render_system_section(ui, settings);
            ui.add_space(gap);

            self.render_reset_section(ui, settings, &mut actions);
        });

        actions
    }

    fn render_text_section(
        &mut self,
        ui: &mut Ui,
        settings: &AccessibilitySettings,
        actions: &mut Vec<SettingsAction>,
    ) {
        section(ui, settings, "Texto", |ui| {
            ui.label(styled("Tamanho da fonte", text_style(sizes::BODY, settings)));

            ui.with_layout(layout_for(resolve_layout_direction(settings.large_buttons)), |ui| {
                for tier in FontSizeTier::ALL {
                    let label = styled(tier_label(tier), text_style(sizes::BODY, settings));
                    if ui
                        .selectable_label(settings.font_size_tier == tier, label)
                        .clicked()
                        && settings.font_size_tier != tier
                    {
                        actions.push(SettingsAction::Update(
                            SettingsPatch::new().font_size_tier(tier),
                        ));
                    }
                }
            });

            ui.label(styled(
                "Exemplo de texto com o tamanho atual.",
                text_style(sizes::BODY, settings),
            ));

            toggle(
                ui,
                settings,
                settings.bold_text,
                "Texto em negrito",
                actions,
                |v| SettingsPatch::new().bold_text(v),
            );
        });
    }

    fn render_visual_section(
        &mut self,
        ui: &mut Ui,
        settings: &AccessibilitySettings,
        actions: &mut Vec<SettingsAction>,
    ) {
        section(ui, settings, "Visual", |ui| {
            toggle(
                ui,
                settings,
                settings.high_contrast,
                "Alto contraste",
                actions,
                |v| SettingsPatch::new().high_contrast(v),
            );
            toggle(
                ui,
                settings,
                settings.large_buttons,
                "Botões grandes",
                actions,
                |v| SettingsPatch::new().large_buttons(v),
            );
            toggle(
                ui,
                settings,
                settings.increased_spacing,
                "Espaçamento aumentado",
                actions,
                |v| SettingsPatch::new().increased_spacing(v),
            );

            if settings.screen_reader_active && !settings.high_contrast {
                ui.label(styled(
                    "Alto contraste ativo enquanto o leitor de tela estiver ligado.",
                    text_style(sizes::SMALL, settings),
                ));
            }
        });
    }

    fn render_audio_section(
        &mut self,
        ui: &mut Ui,
        settings: &AccessibilitySettings,
        actions: &mut Vec<SettingsAction>,
    ) {
        section(ui, settings, "Áudio e vibração", |ui| {
            toggle(
                ui,
                settings,
                settings.sound_enabled,
                "Sons e leitura em voz alta",
                actions,
                |v| SettingsPatch::new().sound_enabled(v),
            );
            toggle(
                ui,
                settings,
                settings.haptic_feedback,
                "Vibração",
                actions,
                |v| SettingsPatch::new().haptic_feedback(v),
            );

            ui.add_enabled_ui(settings.sound_enabled, |ui| {
                ui.label(styled("Velocidade da voz", text_style(sizes::BODY, settings)));
                let mut rate = settings.speech_rate;
                if ui
                    .add(egui::Slider::new(&mut rate, SPEECH_MIN..=SPEECH_MAX).step_by(0.1))
                    .changed()
                {
                    actions.push(SettingsAction::Update(SettingsPatch::new().speech_rate(rate)));
                }

                ui.label(styled("Tom da voz", text_style(sizes::BODY, settings)));
                let mut pitch = settings.speech_pitch;
                if ui
                    .add(egui::Slider::new(&mut pitch, SPEECH_MIN..=SPEECH_MAX).step_by(0.1))
                    .changed()
                {
                    actions.push(SettingsAction::Update(SettingsPatch::new().speech_pitch(pitch)));
                }

                if ui
                    .add(
                        AccessibleButton::new("Ouvir exemplo", settings)
                            .accessible_label("Ouvir exemplo de voz"),
                    )
                    .clicked()
                {
                    actions.push(SettingsAction::PreviewSpeech);
                }
            });

            ui.label(styled("Testar retorno", text_style(sizes::BODY, settings)));
            ui.with_layout(layout_for(resolve_layout_direction(settings.large_buttons)), |ui| {
                for event in FeedbackEvent::ALL {
                    let label = feedback_label(event);
                    if ui
                        .add(
                            AccessibleButton::new(label, settings)
                                .variant(ButtonVariant::Secondary, settings),
                        )
                        .clicked()
                    {
                        actions.push(SettingsAction::PreviewFeedback(event));
                    }
                }
            });
        });
    }

    fn render_system_section(&mut self, ui: &mut Ui, settings: &AccessibilitySettings) {
        section(ui, settings, "Sistema", |ui| {
            let style = text_style(sizes::BODY, settings);
            ui.label(styled(
                &format!("Leitor de tela: {}", on_off(settings.screen_reader_active)),
                style,
            ));
            ui.label(styled(
                &format!("Reduzir movimento: {}", on_off(settings.reduce_motion)),
                style,
            ));
            ui.label(styled(
                "Estas opções seguem as configurações do sistema.",
                text_style(sizes::SMALL, settings),
            ));
        });
    }

    fn render_reset_section(
        &mut self,
        ui: &mut Ui,
        settings: &AccessibilitySettings,
        actions: &mut Vec<SettingsAction>,
    ) {
        if !self.confirm_reset {
            if ui
                .add(
                    AccessibleButton::new("Restaurar padrões", settings)
                        .variant(ButtonVariant::Secondary, settings)
                        .full_width(true),
                )
                .clicked()
            {
                self.confirm_reset = true;
            }
            return;
        }

        ui.label(styled(
            "Restaurar todas as preferências?",
            text_style(sizes::BODY, settings),
        ));
        ui.with_layout(layout_for(resolve_layout_direction(settings.large_buttons)), |ui| {
            if ui
                .add(
                    AccessibleButton::new("Restaurar", settings)
                        .variant(ButtonVariant::Danger, settings),
                )
                .clicked()
            {
                self.confirm_reset = false;
                actions.push(SettingsAction::Reset);
            }
            if ui
                .add(
                    AccessibleButton::new("Cancelar", settings)
                        .variant(ButtonVariant::Secondary, settings),
                )
                .clicked()
            {
                self.confirm_reset = false;
            }
        });
    }
}

fn section(
    ui: &mut Ui,
    settings: &AccessibilitySettings,
    title: &str,
    add_contents: impl FnOnce(&mut Ui),
) {
    ui.group(|ui| {
        ui.set_min_width(ui.available_width());
        ui.label(styled(title, title_style(sizes::HEADING, settings)));
        ui.add_space(resolve_spacing(spacing::ITEM, settings.increased_spacing));
        add_contents(ui);
    });
}

fn toggle(
    ui: &mut Ui,
    settings: &AccessibilitySettings,
    current: bool,
    label: &str,
    actions: &mut Vec<SettingsAction>,
    patch: impl FnOnce(bool) -> SettingsPatch,
) {
    let mut value = current;
    if ui
        .checkbox(&mut value, styled(label, text_style(sizes::BODY, settings)))
        .changed()
    {
        actions.push(SettingsAction::Update(patch(value)));
    }
}

/// Rich text carrying a resolved style.
pub fn styled(text: &str, style: TextStyle) -> RichText {
    let rich = RichText::new(text)
        .size(style.size)
        .line_height(Some(style.line_height.max(style.size)));
    if style.weight.is_bold() {
        rich.strong()
    } else {
        rich
    }
}

fn tier_label(tier: FontSizeTier) -> &'static str {
    match tier {
        FontSizeTier::Small => "Pequeno",
        FontSizeTier::Medium => "Médio",
        FontSizeTier::Large => "Grande",
        FontSizeTier::ExtraLarge => "Extra grande",
    }
}

fn feedback_label(event: FeedbackEvent) -> &'static str {
    match event {
        FeedbackEvent::Tap => "Toque",
        FeedbackEvent::Success => "Sucesso",
        FeedbackEvent::Error => "Erro",
        FeedbackEvent::Warning => "Aviso",
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "ativado"
    } else {
        "desativado"
    }
}

/// Palette name announced when contrast changes.
pub fn contrast_announcement(settings: &AccessibilitySettings) -> &'static str {
    if resolve_palette(settings).is_high_contrast() {
        "Alto contraste ativado"
    } else {
        "Alto contraste desativado"
    }
}
