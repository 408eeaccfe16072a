//! Cursor-follow math: cursor normalization, float bob, target rotation.

use glam::{EulerRot, Quat, Vec2, Vec3};

use super::camera::ViewerCamera;

/// Depth (in NDC) at which the cursor is unprojected into the scene
pub const CURSOR_DEPTH: f32 = 0.8;

/// Rotation of the model around X (pitch) and Y (yaw), radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
}

impl Rotation {
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.x, self.y, 0.0)
    }

    /// Move toward `target` by `gain` of the remaining distance
    pub fn approach(self, target: Rotation, gain: f32) -> Rotation {
        Rotation {
            x: self.x + (target.x - self.x) * gain,
            y: self.y + (target.y - self.y) * gain,
        }
    }
}

/// Map a pointer position within a window of `size` to [-1, 1] on both axes, +Y up.
pub fn normalize_cursor(pos: Vec2, size: Vec2) -> Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec2::ZERO;
    }
    let x = (pos.x / size.x) * 2.0 - 1.0;
    let y = -(pos.y / size.y) * 2.0 + 1.0;
    Vec2::new(x, y).clamp(Vec2::NEG_ONE, Vec2::ONE)
}

/// Vertical offset of the float animation after `elapsed` seconds
pub fn float_offset(elapsed: f32, amplitude: f32) -> f32 {
    elapsed.sin() * amplitude
}

/// Rotation that points the model's +Z axis at the cursor.
///
/// The cursor is unprojected at [`CURSOR_DEPTH`] and the angles are taken
/// from the direction between the model and that point.
pub fn target_rotation(cursor: Vec2, object_position: Vec3, camera: &ViewerCamera) -> Rotation {
    let point = camera.unproject(cursor.extend(CURSOR_DEPTH));
    let direction = (point - object_position).normalize_or_zero();
    Rotation {
        x: -direction.y.atan2(direction.z),
        y: direction.x.atan2(direction.z),
    }
}
