pub mod chat;
pub mod console;
pub mod settings;
pub mod viewer;

use chat::ChatState;
use console::ConsoleLog;
pub use settings::{AppSettings, UiLanguage};
use viewer::ViewerState;

/// Panel visibility flags
pub struct PanelVisibility {
    pub chat: bool,
    pub console: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            chat: true,
            console: true,
        }
    }
}

/// Combined application state
pub struct AppState {
    pub viewer: ViewerState,
    pub chat: ChatState,
    pub console: ConsoleLog,
    pub panels: PanelVisibility,
    pub settings: AppSettings,
    /// Show settings window
    pub show_settings_window: bool,
}

impl AppState {
    /// State with the given settings and nothing loaded
    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            viewer: ViewerState::default(),
            chat: ChatState::default(),
            console: ConsoleLog::default(),
            panels: PanelVisibility::default(),
            settings,
            show_settings_window: false,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(AppSettings::load())
    }
}
