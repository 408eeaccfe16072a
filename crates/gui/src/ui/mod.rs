pub mod chat_panel;
pub mod console_panel;
pub mod status_bar;
