//! Application settings

use serde::{Deserialize, Serialize};

/// Persona the assistant plays in every conversation
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a dramatic and mysterious tarot card reader. \
Create a simulated tarot card reading interaction. Accept a user's question about a future \
occurrence, wait for user input, shuffle a deck of tarot cards and ask the user to draw a random \
card from the deck by asking them to choose a number from 1 to 78, then provide a meaningful \
interpretation based on the selected card associated with the card they picked, and finally \
inquire about whether they want to have another card drawn. If the user says yes, you will repeat \
the entire card selection process again only once. If the user says no, you will conclude the \
interaction by asking for a tip. If the user does not leave a tip, say goodbye rudely in all caps \
and end the interaction by asking no more questions to the user. If the user does leave a tip, \
say goodbye politely and tell them to come again and ask no more questions.";

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UiLanguage {
    #[default]
    En,
    Ru,
}

/// Completion API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL without trailing slash, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub system_prompt: String,
    /// Send earlier turns along with the new message
    pub send_history: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: shared::DEFAULT_MODEL.to_string(),
            max_tokens: shared::DEFAULT_MAX_TOKENS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            send_history: true,
        }
    }
}

/// Model viewer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// OBJ file loaded at startup
    pub model_path: String,
    /// Fraction of the remaining angle covered per frame (1.0 = snap)
    pub follow_gain: f32,
    /// Height of the float animation
    pub float_amplitude: f32,
    /// Leave the color buffer alone so the panel shows through
    pub transparent_background: bool,
    /// Background color RGB when not transparent
    pub background_color: [u8; 3],
    /// Mesh color RGB
    pub model_color: [u8; 3],
    /// Preferred viewport size in points
    pub viewport_size: [f32; 2],
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            model_path: "tarothood2.obj".to_string(),
            follow_gain: 1.0,
            float_amplitude: 0.5,
            transparent_background: true,
            background_color: [30, 30, 35],
            model_color: [204, 204, 204],
            viewport_size: [600.0, 400.0],
        }
    }
}

impl ViewerSettings {
    pub fn model_color_f32(&self) -> [f32; 3] {
        self.model_color.map(|c| c as f32 / 255.0)
    }
}

/// Chat panel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Label shown in front of assistant replies
    pub bot_name: String,
    /// Milliseconds per revealed character, 0 shows replies at once
    pub typewriter_ms: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            bot_name: "TarotBot 🔮".to_string(),
            typewriter_ms: 50,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    pub language: UiLanguage,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: UiLanguage::En,
        }
    }
}

/// All application settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub viewer: ViewerSettings,
    pub chat: ChatSettings,
    pub ui: UiSettings,
}

impl AppSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "oracle", "oracle-gui")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring {}: {e}", config_path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        let Some(config_path) = Self::config_path() else {
            return;
        };
        if let Some(config_dir) = config_path.parent() {
            if let Err(e) = std::fs::create_dir_all(config_dir) {
                tracing::error!("Failed to create {}: {e}", config_dir.display());
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&config_path, json) {
                    tracing::error!("Failed to write settings: {e}");
                }
            }
            Err(e) => tracing::error!("Failed to serialize settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let json = r#"{ "api": { "model": "gpt-4o-mini" }, "chat": { "typewriter_ms": 0 } }"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.api.model, "gpt-4o-mini");
        assert_eq!(settings.api.base_url, "https://api.openai.com/v1");
        assert_eq!(settings.api.max_tokens, 500);
        assert_eq!(settings.chat.typewriter_ms, 0);
        assert_eq!(settings.chat.bot_name, "TarotBot 🔮");
        assert_eq!(settings.viewer, ViewerSettings::default());
    }

    #[test]
    fn test_model_color_conversion() {
        let viewer = ViewerSettings {
            model_color: [255, 0, 51],
            ..Default::default()
        };
        assert_eq!(viewer.model_color_f32(), [1.0, 0.0, 0.2]);
    }
}
