//! Main application module

mod menus;
mod styles;

use std::path::PathBuf;
use std::time::Instant;

use eframe::egui;

use crate::ai::ApiWorker;
use crate::i18n::apply_language;
use crate::state::AppState;
use crate::ui::{chat_panel, console_panel, status_bar};
use crate::viewport::ViewportPanel;

/// Main application
pub struct OracleApp {
    state: AppState,
    viewport: ViewportPanel,
    worker: Option<ApiWorker>,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl OracleApp {
    pub fn new(cc: &eframe::CreationContext<'_>, model_override: Option<PathBuf>) -> Self {
        let mut state = AppState::default();
        apply_language(state.settings.ui.language);

        // Apply initial styles with font size from settings
        styles::configure_styles(&cc.egui_ctx, state.settings.ui.font_size);

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            state.chat.api_key = key;
        }

        // CLI argument takes priority over the configured model path
        let model_path =
            model_override.unwrap_or_else(|| PathBuf::from(&state.settings.viewer.model_path));
        let color = state.settings.viewer.model_color_f32();
        // Failure is already logged; the viewport just stays empty
        let _ = state
            .viewer
            .load_model(&model_path, color, &mut state.console);

        let worker = match ApiWorker::new() {
            Ok(mut worker) => {
                let ctx = cc.egui_ctx.clone();
                worker.set_waker(move || ctx.request_repaint());
                Some(worker)
            }
            Err(e) => {
                tracing::error!("Failed to start network worker: {e}");
                state.console.log(format!("Error: {e}"));
                None
            }
        };

        let mut viewport = ViewportPanel::new();

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        let last_font_size = state.settings.ui.font_size;

        Self {
            state,
            viewport,
            worker,
            last_font_size,
        }
    }
}

impl eframe::App for OracleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        // Finished network calls
        if let Some(worker) = &self.worker {
            let now = Instant::now();
            for event in worker.poll() {
                self.state.chat.apply(event, &mut self.state.console, now);
            }
        }

        // Cursor relative to the whole window
        let (pointer, screen) = ctx.input(|i| (i.pointer.latest_pos(), i.screen_rect()));
        if let Some(pos) = pointer {
            self.state.viewer.set_cursor(
                glam::Vec2::new(pos.x - screen.min.x, pos.y - screen.min.y),
                glam::Vec2::new(screen.width(), screen.height()),
            );
        }

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state);
                menus::settings_menu(ui, &mut self.state);
            });
        });

        // ── Settings window ──────────────────────────────────
        menus::settings_window(ctx, &mut self.state);

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state);
            });

        // ── Bottom panel: console output ─────────────────────
        if self.state.panels.console {
            egui::TopBottomPanel::bottom("console")
                .default_height(140.0)
                .height_range(60.0..=400.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    console_panel::show(ui, &mut self.state);
                });
        }

        // ── Right panel: Chat ────────────────────────────────
        if self.state.panels.chat {
            egui::SidePanel::right("chat_panel")
                .default_width(360.0)
                .width_range(240.0..=600.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    chat_panel::show(ui, &mut self.state, &mut self.worker);
                });
        }

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
    }
}
