use ratatui::style::Color;
use relay_core::chat::ConnectionStatus;

pub struct Theme {
    pub border_focus: Color,
    pub border_inactive: Color,
    pub chat_border: Color,
    pub user: Color,
    pub assistant: Color,
    pub error: Color,
    pub online: Color,
    pub connecting: Color,
    pub hint: Color,
}

pub const THEME: Theme = Theme {
    border_focus: Color::Cyan,
    border_inactive: Color::DarkGray,
    chat_border: Color::DarkGray,
    user: Color::Green,
    assistant: Color::Magenta,
    error: Color::Rgb(0xef, 0x44, 0x44),
    online: Color::Rgb(0x10, 0xa3, 0x7f),
    connecting: Color::Yellow,
    hint: Color::DarkGray,
};

pub fn status_color(status: Option<ConnectionStatus>) -> Color {
    match status {
        Some(s) if s.is_online() => THEME.online,
        Some(_) => THEME.error,
        None => THEME.connecting,
    }
}
