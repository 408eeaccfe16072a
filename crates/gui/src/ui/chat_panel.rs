use std::time::{Duration, Instant};

use egui::Ui;

use crate::ai::Dispatch;
use crate::i18n::t;
use crate::state::chat::{ChatMessage, ChatRole};
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &mut AppState, dispatcher: &mut impl Dispatch) {
    // Header with clear button
    ui.horizontal(|ui| {
        ui.heading(t("chat.title"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if !state.chat.messages.is_empty()
                && ui
                    .small_button(t("chat.clear"))
                    .on_hover_text(t("chat.clear_tip"))
                    .clicked()
            {
                state.chat.clear();
            }
        });
    });
    ui.separator();

    show_credentials(ui, state, &mut *dispatcher);
    ui.separator();

    let now = Instant::now();
    let ms_per_char = state.settings.chat.typewriter_ms;
    let mut typing = false;

    // Message history (scrollable)
    let scroll_height = (ui.available_height() - 36.0).max(60.0);
    egui::ScrollArea::vertical()
        .id_salt("chat_scroll")
        .max_height(scroll_height)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if state.chat.messages.is_empty() && !state.chat.is_loading() {
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    ui.weak(t("chat.placeholder"));
                });
            }

            for msg in &state.chat.messages {
                typing |= msg.is_typing(now, ms_per_char);
                show_message(ui, msg, &state.settings.chat.bot_name, now, ms_per_char);
            }

            if state.chat.is_loading() {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak(t("chat.thinking"));
                });
            }
        });

    if typing {
        ui.ctx()
            .request_repaint_after(Duration::from_millis(ms_per_char.max(16)));
    }

    // Input area
    ui.add_space(2.0);
    ui.horizontal(|ui| {
        let button_w = 70.0;
        let available_w = (ui.available_width() - button_w - 8.0).max(40.0);
        let input_resp = ui.add_sized(
            [available_w, 22.0],
            egui::TextEdit::singleline(&mut state.chat.input)
                .hint_text(t("chat.ask"))
                .desired_width(available_w),
        );

        let enter_pressed =
            input_resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let send_clicked = ui.button(t("chat.send")).clicked();

        if send_clicked || enter_pressed {
            let sent = state.chat.send_message(
                &state.settings.api,
                &mut state.console,
                &mut *dispatcher,
            );
            if enter_pressed && sent {
                input_resp.request_focus();
            }
        }
    });
}

fn show_credentials(ui: &mut Ui, state: &mut AppState, dispatcher: &mut impl Dispatch) {
    ui.horizontal(|ui| {
        ui.label(t("chat.api_key"));
        let test_w = 110.0;
        let available_w = (ui.available_width() - test_w - 8.0).max(40.0);
        ui.add_sized(
            [available_w, 22.0],
            egui::TextEdit::singleline(&mut state.chat.api_key)
                .hint_text(t("chat.api_key_hint"))
                .password(true),
        );
        if ui.button(t("chat.test_key")).clicked() {
            state
                .chat
                .test_api_key(&state.settings.api, &mut state.console, &mut *dispatcher);
        }
    });
}

/// Render a single chat message
fn show_message(ui: &mut Ui, msg: &ChatMessage, bot_name: &str, now: Instant, ms_per_char: u64) {
    let (prefix, color, bg) = if msg.is_error {
        (
            bot_name,
            egui::Color32::from_rgb(255, 130, 130),
            egui::Color32::from_rgba_premultiplied(80, 30, 30, 200),
        )
    } else {
        match msg.role {
            ChatRole::User => (
                t("chat.you"),
                egui::Color32::from_rgb(130, 190, 255),
                egui::Color32::from_rgba_premultiplied(40, 60, 90, 200),
            ),
            ChatRole::Assistant => (
                bot_name,
                egui::Color32::from_rgb(214, 170, 255),
                egui::Color32::from_rgba_premultiplied(55, 35, 80, 200),
            ),
        }
    };

    egui::Frame::NONE
        .fill(bg)
        .corner_radius(egui::CornerRadius::same(4))
        .inner_margin(egui::Margin::same(6))
        .outer_margin(egui::Margin::symmetric(0, 2))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(format!("{prefix}:")).strong().color(color));
                ui.label(msg.visible_text(now, ms_per_char));
            });
        });
}
