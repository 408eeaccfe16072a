use egui::Ui;

use crate::i18n::t;
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        match (state.viewer.mesh(), state.viewer.model_path()) {
            (Some(mesh), path) => {
                let name = path
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                ui.weak(format!("{}: {name}", t("status.model")));
                ui.separator();
                ui.weak(format!("{}: {}", t("status.triangles"), mesh.triangle_count()));
            }
            (None, _) => {
                ui.weak(t("viewport.no_model"));
            }
        }

        ui.separator();
        let cursor = state.viewer.cursor;
        ui.weak(format!("{}: {:+.2} {:+.2}", t("status.cursor"), cursor.x, cursor.y));

        let pending = state.chat.pending();
        if pending > 0 {
            ui.separator();
            ui.colored_label(
                egui::Color32::from_rgb(255, 200, 100),
                format!("{}: {pending}", t("status.waiting")),
            );
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(concat!("Oracle v", env!("CARGO_PKG_VERSION")));
        });
    });
}
