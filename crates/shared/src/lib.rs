use serde::{Deserialize, Serialize};

/// Модель по умолчанию для запросов чата
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Лимит токенов ответа по умолчанию
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Роль автора сообщения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Одно сообщение диалога в формате API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Тело запроса `POST /chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// Сообщение внутри варианта ответа. `content` может быть `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReplyMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Вариант ответа модели
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ReplyMessage,
}

/// Ответ `POST /chat/completions` (лишние поля игнорируются)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    /// Текст первого варианта без пробелов по краям
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
    }
}

/// HTTP-статус из диапазона 2xx
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Результат проверки API-ключа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeyCheck {
    Valid,
    Invalid { status: u16 },
}

impl KeyCheck {
    pub fn from_status(status: u16) -> Self {
        if is_success_status(status) {
            KeyCheck::Valid
        } else {
            KeyCheck::Invalid { status }
        }
    }
}
