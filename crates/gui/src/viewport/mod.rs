//! 3D viewport panel with OpenGL rendering

mod gl_renderer;
pub use oracle_gui_lib::viewport::{camera, mesh};

use std::sync::{Arc, Mutex};
use std::time::Instant;

use egui::Ui;

use crate::i18n::t;
use crate::state::AppState;
use camera::ViewerCamera;
use gl_renderer::GlRenderer;
use mesh::MeshData;

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    /// Shared copy of the current mesh handed to the paint callback
    shared_mesh: Option<Arc<MeshData>>,
    shared_version: Option<u64>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            gl_renderer: None,
            shared_mesh: None,
            shared_version: None,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::error!("Failed to initialize GL renderer: {e}"),
        }
    }

    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        let (full, _) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());

        // Fixed-size container centered in the panel, shrunk to fit
        let [w, h] = state.settings.viewer.viewport_size;
        let size = egui::vec2(w.min(full.width()), h.min(full.height()));
        let rect = egui::Rect::from_center_size(full.center(), size);
        if rect.width() < 1.0 || rect.height() < 1.0 {
            return;
        }

        let camera = ViewerCamera::default().with_aspect(rect.width() / rect.height());

        if let Some(elapsed) = state.viewer.elapsed(Instant::now()) {
            state
                .viewer
                .advance(elapsed, &camera, &state.settings.viewer);
            ui.ctx().request_repaint();
        }

        if !state.settings.viewer.transparent_background {
            let [r, g, b] = state.settings.viewer.background_color;
            ui.painter()
                .rect_filled(rect, 0.0, egui::Color32::from_rgb(r, g, b));
        }

        if self.gl_renderer.is_some() {
            self.render_gl(ui, rect, &camera, state);
        }

        self.draw_overlays(ui, rect, state);
    }

    /// Refresh the shared mesh when the loaded model changed
    fn sync_shared_mesh(&mut self, state: &AppState) {
        let version = state.viewer.mesh_version();
        if self.shared_version != Some(version) {
            self.shared_mesh = state.viewer.mesh().cloned().map(Arc::new);
            self.shared_version = Some(version);
        }
    }

    fn render_gl(&mut self, ui: &mut Ui, rect: egui::Rect, camera: &ViewerCamera, state: &AppState) {
        self.sync_shared_mesh(state);

        let Some(gl_renderer) = &self.gl_renderer else {
            return;
        };

        let renderer_clone = gl_renderer.clone();
        let mesh = self.shared_mesh.clone();
        let version = state.viewer.mesh_version();
        let view_projection = camera.view_projection();
        let model = state.viewer.model_matrix();
        let clear_color = if state.settings.viewer.transparent_background {
            None
        } else {
            Some(state.settings.viewer.background_color.map(|c| c as f32 / 255.0))
        };

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(
                move |info, painter| {
                    let gl = painter.gl();

                    let (viewport, scissor) = gl_boxes(&info);

                    if let Ok(mut r) = renderer_clone.lock() {
                        r.sync_mesh(gl, mesh.as_deref(), version);

                        let render_params = gl_renderer::RenderParams {
                            viewport,
                            scissor,
                            view_projection,
                            model,
                            clear_color,
                        };
                        r.paint(gl, &render_params);
                    }
                },
            )),
        };

        ui.painter_at(rect).add(callback);
    }

    fn draw_overlays(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let painter = ui.painter_at(rect);

        let message = if state.viewer.mesh().is_none() {
            Some(t("viewport.no_model"))
        } else if self.gl_renderer.is_none() {
            Some(t("viewport.no_gl"))
        } else {
            None
        };

        if let Some(message) = message {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                message,
                egui::FontId::proportional(14.0),
                egui::Color32::from_rgb(120, 120, 130),
            );
        }
    }
}

/// GL viewport and scissor boxes `[x, y, width, height]`, origin bottom-left.
///
/// The viewport follows the callback rect so the projection keeps its aspect;
/// the scissor follows the clip rect.
fn gl_boxes(info: &egui::PaintCallbackInfo) -> ([f32; 4], [f32; 4]) {
    let to_box = |px: egui::epaint::ViewportInPixels| {
        [
            px.left_px as f32,
            px.from_bottom_px as f32,
            px.width_px as f32,
            px.height_px as f32,
        ]
    };
    (
        to_box(info.viewport_in_pixels()),
        to_box(info.clip_rect_in_pixels()),
    )
}
