//! Application menu bar and settings window

use std::path::PathBuf;

use eframe::egui;

use crate::i18n::{apply_language, lang, t, Lang};
use crate::state::{AppSettings, AppState, UiLanguage};

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.open_model")).clicked() {
            ui.close_menu();
            if let Some(path) = rfd::FileDialog::new()
                .set_title(t("menu.open_model_title"))
                .add_filter("OBJ", &["obj"])
                .pick_file()
            {
                load_model(state, path);
            }
        }
        let current = state.viewer.model_path().map(|p| p.to_path_buf());
        if ui
            .add_enabled(current.is_some(), egui::Button::new(t("menu.reload_model")))
            .clicked()
        {
            ui.close_menu();
            if let Some(path) = current {
                load_model(state, path);
            }
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn load_model(state: &mut AppState, path: PathBuf) {
    let color = state.settings.viewer.model_color_f32();
    if state
        .viewer
        .load_model(&path, color, &mut state.console)
        .is_ok()
    {
        state.settings.viewer.model_path = path.display().to_string();
    }
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut state.panels.chat, t("menu.chat"));
        ui.checkbox(&mut state.panels.console, t("menu.console"));
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            if ui.selectable_label(lang() == Lang::En, "English").clicked() {
                state.settings.ui.language = UiLanguage::En;
                apply_language(UiLanguage::En);
                ui.close_menu();
            }
            if ui.selectable_label(lang() == Lang::Ru, "Русский").clicked() {
                state.settings.ui.language = UiLanguage::Ru;
                apply_language(UiLanguage::Ru);
                ui.close_menu();
            }
        });
    });
}

/// Show the settings menu
pub fn settings_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.settings"), |ui| {
        if ui.button(t("menu.preferences")).clicked() {
            state.show_settings_window = true;
            ui.close_menu();
        }
    });
}

/// Settings window (API, viewer, chat, interface)
pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_settings_window;
    egui::Window::new(t("settings.title"))
        .open(&mut open)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                show_api_settings(ui, state);
                show_viewer_settings(ui, state);
                show_chat_settings(ui, state);
                show_ui_settings(ui, state);
                show_settings_buttons(ui, state);
            });
        });
    state.show_settings_window = open && state.show_settings_window;
}

fn show_api_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let api = &mut state.settings.api;
    ui.heading(t("settings.api"));
    egui::Grid::new("api_settings")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label(t("settings.base_url"));
            ui.text_edit_singleline(&mut api.base_url);
            ui.end_row();

            ui.label(t("settings.model"));
            ui.text_edit_singleline(&mut api.model);
            ui.end_row();

            ui.label(t("settings.max_tokens"));
            ui.add(egui::DragValue::new(&mut api.max_tokens).range(1..=16384));
            ui.end_row();
        });
    ui.checkbox(&mut api.send_history, t("settings.send_history"));

    ui.label(t("settings.system_prompt"));
    ui.add(
        egui::TextEdit::multiline(&mut api.system_prompt)
            .desired_rows(6)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(10.0);
}

fn show_viewer_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.viewer"));
    let before = state.settings.viewer.model_color;
    let viewer = &mut state.settings.viewer;

    egui::Grid::new("viewer_settings")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label(t("settings.model_path"));
            ui.text_edit_singleline(&mut viewer.model_path);
            ui.end_row();

            ui.label(t("settings.follow_gain"));
            ui.add(egui::Slider::new(&mut viewer.follow_gain, 0.01..=1.0));
            ui.end_row();

            ui.label(t("settings.float_amplitude"));
            ui.add(egui::Slider::new(&mut viewer.float_amplitude, 0.0..=2.0));
            ui.end_row();

            ui.label(t("settings.model_color"));
            ui.color_edit_button_srgb(&mut viewer.model_color);
            ui.end_row();

            ui.label(t("settings.bg_color"));
            ui.add_enabled_ui(!viewer.transparent_background, |ui| {
                ui.color_edit_button_srgb(&mut viewer.background_color);
            });
            ui.end_row();
        });
    ui.checkbox(&mut viewer.transparent_background, t("settings.transparent"));

    if state.settings.viewer.model_color != before {
        let color = state.settings.viewer.model_color_f32();
        state.viewer.recolor(color);
    }
    ui.add_space(10.0);
}

fn show_chat_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let chat = &mut state.settings.chat;
    ui.heading(t("settings.chat"));
    ui.horizontal(|ui| {
        ui.label(t("settings.bot_name"));
        ui.text_edit_singleline(&mut chat.bot_name);
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.typewriter"));
        ui.add(
            egui::DragValue::new(&mut chat.typewriter_ms)
                .range(0..=500)
                .suffix(" ms"),
        );
    });
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.ui"));
    ui.horizontal(|ui| {
        ui.label(t("settings.font_size"));
        ui.add(
            egui::DragValue::new(&mut state.settings.ui.font_size)
                .speed(0.5)
                .range(8.0..=24.0)
                .suffix(" pt"),
        );
    });
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button(t("settings.apply")).clicked() {
            state.settings.save();
        }
        if ui.button(t("settings.reset")).clicked() {
            state.settings = AppSettings::default();
            apply_language(state.settings.ui.language);
            let color = state.settings.viewer.model_color_f32();
            state.viewer.recolor(color);
        }
        if ui.button(t("settings.close")).clicked() {
            state.show_settings_window = false;
        }
    });
}
