//! File description screen.
//!
//! The user names a photo or document on disk; the shell sends it to the
//! analysis backend and reads the answer aloud.

use std::path::PathBuf;

use egui::Ui;

use crate::accessibility::resolver::{resolve_layout_direction, text_style, title_style};
use crate::accessibility::settings::AccessibilitySettings;
use crate::api::DescribeMode;
use crate::ui::screens::settings::styled;
use crate::ui::theme::{layout_for, sizes};
use crate::ui::widgets::{AccessibleButton, ButtonVariant};

/// Intent reported by the describe screen.
#[derive(Debug, Clone, PartialEq)]
pub enum DescribeAction {
    Submit(PathBuf, DescribeMode),
    /// Read the last result again
    Repeat,
}

#[derive(Debug, Default)]
pub struct DescribeScreen {
    path: String,
    /// Request in flight
    busy: bool,
    last_result: Option<String>,
}

impl DescribeScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// Record a finished request.
    pub fn finish(&mut self, text: impl Into<String>) {
        self.busy = false;
        self.last_result = Some(text.into());
    }

    pub fn show(&mut self, ui: &mut Ui, settings: &AccessibilitySettings) -> Vec<DescribeAction> {
        let mut actions = Vec::new();

        ui.label(styled("Descrever", title_style(sizes::TITLE, settings)));
        ui.label(styled(
            "Informe o caminho de uma foto ou documento.",
            text_style(sizes::SMALL, settings),
        ));

        let label = ui.label(styled("Caminho do arquivo", text_style(sizes::BODY, settings)));
        ui.add(
            egui::TextEdit::singleline(&mut self.path)
                .hint_text("/home/usuario/foto.jpg")
                .font(egui::FontId::proportional(text_style(sizes::BODY, settings).size))
                .desired_width(f32::INFINITY),
        )
        .labelled_by(label.id);

        let path = self.path.trim();
        let ready = !self.busy && !path.is_empty();

        ui.with_layout(layout_for(resolve_layout_direction(settings.large_buttons)), |ui| {
            for (label, mode) in [
                ("Descrever imagem", DescribeMode::Image),
                ("Ler documento", DescribeMode::Document),
            ] {
                if ui
                    .add(AccessibleButton::new(label, settings).enabled(ready))
                    .clicked()
                {
                    actions.push(DescribeAction::Submit(PathBuf::from(path), mode));
                }
            }
        });

        if self.busy {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(styled("Analisando...", text_style(sizes::BODY, settings)));
            });
        }

        if let Some(result) = &self.last_result {
            ui.separator();
            ui.label(styled(result, text_style(sizes::BODY, settings)));
            if ui
                .add(
                    AccessibleButton::new("Ouvir novamente", settings)
                        .variant(ButtonVariant::Secondary, settings),
                )
                .clicked()
            {
                actions.push(DescribeAction::Repeat);
            }
        }

        if actions
            .iter()
            .any(|a| matches!(a, DescribeAction::Submit(..)))
        {
            self.busy = true;
        }

        actions
    }
}
