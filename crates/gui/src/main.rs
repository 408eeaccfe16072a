mod app;
pub mod i18n;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state` etc. resolve to the lib
// crate types everywhere in the binary.
pub use oracle_gui_lib::ai;
pub use oracle_gui_lib::state;

use std::path::PathBuf;

use app::OracleApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oracle_gui=info,oracle_gui_lib=info".into()),
        )
        .init();

    let model_override = parse_model_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Oracle Tarot Viewer")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([700.0, 450.0]),
        depth_buffer: 24,
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "oracle-gui",
        native_options,
        Box::new(move |cc| Ok(Box::new(OracleApp::new(cc, model_override)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

/// `--model <path>` overrides the configured OBJ file
fn parse_model_arg() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--model" {
            let path = args.next();
            if path.is_none() {
                tracing::warn!("--model needs a path argument");
            }
            return path.map(PathBuf::from);
        }
    }
    None
}
