use glam::{Mat4, Vec3, Vec4};

/// Fixed perspective camera looking down -Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerCamera {
    /// Camera position in world space
    pub position: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    /// Width / height of the viewport
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ViewerCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 7.0),
            fov: 75.0_f32.to_radians(),
            aspect: 600.0 / 400.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl ViewerCamera {
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
        self
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Map a point in normalized device coordinates back to world space
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        let world = self.view_projection().inverse() * Vec4::new(ndc.x, ndc.y, ndc.z, 1.0);
        world.truncate() / world.w
    }
}
