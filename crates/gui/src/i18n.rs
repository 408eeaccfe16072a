use std::sync::atomic::{AtomicU8, Ordering};

use crate::state::UiLanguage;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    En,
    Ru,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=En (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Lang::Ru,
        _ => Lang::En,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::En => 0,
            Lang::Ru => 1,
        },
        Ordering::Relaxed,
    );
}

/// Switch to the language stored in settings
pub fn apply_language(language: UiLanguage) {
    set_lang(match language {
        UiLanguage::En => Lang::En,
        UiLanguage::Ru => Lang::Ru,
    });
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if ru { "Файл" } else { "File" },
        "menu.open_model" => if ru { "Открыть модель..." } else { "Open model..." },
        "menu.open_model_title" => if ru { "Открыть OBJ модель" } else { "Open OBJ model" },
        "menu.reload_model" => if ru { "Перезагрузить модель" } else { "Reload model" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.chat" => if ru { "Чат" } else { "Chat" },
        "menu.console" => if ru { "Консоль" } else { "Console" },
        "menu.language" => if ru { "Язык" } else { "Language" },

        "menu.settings" => if ru { "Настройки" } else { "Settings" },
        "menu.preferences" => if ru { "Параметры..." } else { "Preferences..." },

        // ── Chat panel ──────────────────────────────────────
        "chat.title" => if ru { "Гадание на Таро" } else { "Tarot reading" },
        "chat.clear" => if ru { "Очистить" } else { "Clear" },
        "chat.clear_tip" => if ru { "Очистить историю чата" } else { "Clear chat history" },
        "chat.placeholder" => if ru { "Задайте вопрос о будущем" } else { "Ask a question about your future" },
        "chat.you" => if ru { "Вы" } else { "You" },
        "chat.ask" => if ru { "Ваш вопрос..." } else { "Type your message..." },
        "chat.send" => if ru { "Отправить" } else { "Send" },
        "chat.thinking" => if ru { "Карты тасуются..." } else { "Shuffling the cards..." },
        "chat.api_key" => if ru { "API-ключ" } else { "API key" },
        "chat.api_key_hint" => if ru { "sk-..." } else { "sk-..." },
        "chat.test_key" => if ru { "Проверить ключ" } else { "Test API key" },

        // ── Console ─────────────────────────────────────────
        "console.title" => if ru { "Консоль" } else { "Console" },
        "console.clear" => if ru { "Очистить" } else { "Clear" },
        "console.copy" => if ru { "Копировать" } else { "Copy" },

        // ── Viewport ────────────────────────────────────────
        "viewport.no_model" => if ru { "Модель не загружена" } else { "No model loaded" },
        "viewport.no_gl" => if ru { "OpenGL недоступен" } else { "OpenGL unavailable" },

        // ── Status bar ──────────────────────────────────────
        "status.model" => if ru { "Модель" } else { "Model" },
        "status.triangles" => if ru { "Треугольники" } else { "Triangles" },
        "status.cursor" => if ru { "Курсор" } else { "Cursor" },
        "status.waiting" => if ru { "Ожидание ответа" } else { "Awaiting reply" },

        // ── Settings window ─────────────────────────────────
        "settings.title" => if ru { "Настройки" } else { "Settings" },
        "settings.api" => if ru { "API" } else { "API" },
        "settings.base_url" => if ru { "Базовый URL" } else { "Base URL" },
        "settings.model" => if ru { "Модель" } else { "Model" },
        "settings.max_tokens" => if ru { "Макс. токенов" } else { "Max tokens" },
        "settings.send_history" => if ru { "Отправлять историю диалога" } else { "Send conversation history" },
        "settings.system_prompt" => if ru { "Системный промпт" } else { "System prompt" },

        "settings.viewer" => if ru { "Просмотр" } else { "Viewer" },
        "settings.model_path" => if ru { "Файл модели" } else { "Model file" },
        "settings.follow_gain" => if ru { "Скорость поворота" } else { "Follow gain" },
        "settings.float_amplitude" => if ru { "Амплитуда парения" } else { "Float amplitude" },
        "settings.transparent" => if ru { "Прозрачный фон" } else { "Transparent background" },
        "settings.bg_color" => if ru { "Цвет фона" } else { "Background color" },
        "settings.model_color" => if ru { "Цвет модели" } else { "Model color" },

        "settings.chat" => if ru { "Чат" } else { "Chat" },
        "settings.bot_name" => if ru { "Имя бота" } else { "Bot name" },
        "settings.typewriter" => if ru { "Печать, мс на символ" } else { "Typewriter, ms per char" },

        "settings.ui" => if ru { "Интерфейс" } else { "Interface" },
        "settings.font_size" => if ru { "Размер шрифта" } else { "Font size" },

        "settings.apply" => if ru { "Применить" } else { "Apply" },
        "settings.reset" => if ru { "Сбросить" } else { "Reset" },
        "settings.close" => if ru { "Закрыть" } else { "Close" },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}
