use std::path::{Path, PathBuf};
use std::time::Instant;

use glam::{Mat4, Vec2, Vec3};

use super::console::ConsoleLog;
use super::settings::ViewerSettings;
use crate::viewport::camera::ViewerCamera;
use crate::viewport::follow::{float_offset, normalize_cursor, target_rotation, Rotation};
use crate::viewport::mesh::MeshData;
use crate::viewport::obj::{load_obj, ObjError};

/// Resting position of the model before the float offset
pub const BASE_POSITION: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Loaded model and its per-frame pose
pub struct ViewerState {
    mesh: Option<MeshData>,
    model_path: Option<PathBuf>,
    /// Bumped every time the mesh changes so the GPU copy can be refreshed
    mesh_version: u64,
    /// Normalized cursor, both axes in [-1, 1]
    pub cursor: Vec2,
    pub position: Vec3,
    pub rotation: Rotation,
    pub target: Rotation,
    /// Float clock; starts when a model finishes loading
    clock_start: Option<Instant>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            mesh: None,
            model_path: None,
            mesh_version: 0,
            cursor: Vec2::ZERO,
            position: BASE_POSITION,
            rotation: Rotation::default(),
            target: Rotation::default(),
            clock_start: None,
        }
    }
}

impl ViewerState {
    pub fn mesh(&self) -> Option<&MeshData> {
        self.mesh.as_ref()
    }

    pub fn mesh_version(&self) -> u64 {
        self.mesh_version
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Replace the current model. Errors are logged and the old model is dropped.
    pub fn load_model(
        &mut self,
        path: impl AsRef<Path>,
        color: [f32; 3],
        console: &mut ConsoleLog,
    ) -> Result<(), ObjError> {
        let path = path.as_ref();
        let result = load_obj(path, color);
        match result {
            Ok(mesh) => {
                console.log(format!(
                    "Loaded {} ({} triangles)",
                    path.display(),
                    mesh.triangle_count()
                ));
                self.set_mesh(mesh, Some(path.to_path_buf()));
                Ok(())
            }
            Err(e) => {
                console.log(format!("An error occurred while loading the OBJ file: {e}"));
                self.mesh = None;
                self.model_path = None;
                self.mesh_version += 1;
                self.clock_start = None;
                Err(e)
            }
        }
    }

    /// Install an already built mesh and restart the float clock
    pub fn set_mesh(&mut self, mesh: MeshData, path: Option<PathBuf>) {
        self.mesh = Some(mesh);
        self.model_path = path;
        self.mesh_version += 1;
        self.position = BASE_POSITION;
        self.rotation = Rotation::default();
        self.clock_start = Some(Instant::now());
    }

    pub fn recolor(&mut self, color: [f32; 3]) {
        if let Some(mesh) = self.mesh.as_mut() {
            mesh.recolor(color);
            self.mesh_version += 1;
        }
    }

    /// Track the pointer relative to the whole window
    pub fn set_cursor(&mut self, pointer: Vec2, window_size: Vec2) {
        self.cursor = normalize_cursor(pointer, window_size);
    }

    /// Seconds since the model was loaded, `None` without a model
    pub fn elapsed(&self, now: Instant) -> Option<f32> {
        self.clock_start
            .map(|start| now.saturating_duration_since(start).as_secs_f32())
    }

    /// One animation step: float, aim at the cursor, interpolate.
    ///
    /// Does nothing until a model is loaded.
    pub fn advance(&mut self, elapsed: f32, camera: &ViewerCamera, settings: &ViewerSettings) {
        if self.mesh.is_none() {
            return;
        }
        self.position.y = BASE_POSITION.y + float_offset(elapsed, settings.float_amplitude);
        self.target = target_rotation(self.cursor, self.position, camera);
        self.rotation = self.rotation.approach(self.target, settings.follow_gain);
    }

    /// Model matrix for the current pose
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation.to_quat(), self.position)
    }
}
