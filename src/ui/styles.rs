//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

/// Style for the channel header badge.
pub fn channel_header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Style for the message sender name (magenta, bold, matching the
/// source client's palette).
pub fn sender_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Style for the message time column.
pub fn time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for message body text.
pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for the error screen.
pub fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

/// Style for the input prompt symbol.
pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Blue)
}

/// Style for the input border.
pub fn input_border_style() -> Style {
    Style::default().fg(Color::Blue)
}

/// Style for the history-browsing indicator.
pub fn history_indicator_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_style_is_bold_magenta() {
        let style = sender_style();
        assert_eq!(style.fg, Some(Color::Magenta));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn error_style_is_red() {
        assert_eq!(error_style().fg, Some(Color::Red));
    }

    #[test]
    fn time_style_is_dimmed() {
        assert_eq!(time_style().fg, Some(Color::DarkGray));
    }
}
