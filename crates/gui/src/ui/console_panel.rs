use egui::Ui;

use crate::i18n::t;
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.strong(t("console.title"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button(t("console.clear")).clicked() {
                state.console.clear();
            }
            if ui.small_button(t("console.copy")).clicked() {
                ui.ctx().copy_text(state.console.text());
            }
        });
    });

    egui::ScrollArea::vertical()
        .id_salt("console_scroll")
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for line in state.console.lines() {
                ui.label(egui::RichText::new(line).monospace().weak());
            }
        });
}
