// Library crate: exposes testable modules for integration tests.
// GUI-specific modules (app, ui, GL rendering) remain in the binary crate.

pub mod ai;
pub mod state;

/// Viewport math and mesh loading. The GL renderer stays in the binary crate.
pub mod viewport {
    pub mod camera;
    pub mod follow;
    pub mod mesh;
    pub mod obj;
}
