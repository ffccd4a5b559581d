//! Pure projection from session state to a frame. Never mutates state.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::{message::Message, session_state::SessionState};

use super::styles;

const PROMPT_SYMBOL: &str = "> ";

pub fn render(frame: &mut Frame<'_>, state: &SessionState) {
    if !state.is_ready() {
        frame.render_widget(Paragraph::new("Initializing..."), frame.area());
        return;
    }

    // While an error is set it owns the screen; the log and the input
    // come back once a later cycle replaces or clears it.
    if let Some(error) = state.last_error() {
        let text = format!("Error: {error}\nPress Esc or Ctrl+C to quit.");
        frame.render_widget(
            Paragraph::new(text).style(styles::error_style()),
            frame.area(),
        );
        return;
    }

    let [header_area, log_area, input_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .areas(frame.area());

    render_header(frame, header_area, state);
    render_message_log(frame, log_area, state);
    render_input(frame, input_area, state);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &SessionState) {
    let header = Line::from(Span::styled(
        format!(" #{} ", state.channel_name()),
        styles::channel_header_style(),
    ));
    frame.render_widget(Paragraph::new(header), area);
}

fn render_message_log(frame: &mut Frame<'_>, area: Rect, state: &SessionState) {
    let lines: Vec<Line<'static>> = state
        .store()
        .messages()
        .iter()
        .map(message_line)
        .collect();

    // Keep the newest messages visible: scroll so the last line sits
    // at the bottom of the log area.
    let scroll = scroll_offset(lines.len(), area.height as usize);

    let log = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(log, area);
}

fn render_input(frame: &mut Frame<'_>, area: Rect, state: &SessionState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::input_border_style());
    let block = match history_indicator(state) {
        Some(indicator) => block.title(Span::styled(indicator, styles::history_indicator_style())),
        None => block,
    };

    let line = Line::from(vec![
        Span::styled(PROMPT_SYMBOL, styles::input_prompt_style()),
        Span::raw(state.input().text().to_owned()),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    let cursor_x = area
        .x
        .saturating_add(1)
        .saturating_add(PROMPT_SYMBOL.width() as u16)
        .saturating_add(cursor_column(state) as u16);
    frame.set_cursor_position((cursor_x, area.y.saturating_add(1)));
}

fn message_line(message: &Message) -> Line<'static> {
    Line::from(vec![
        Span::styled(message.format_time(), styles::time_style()),
        Span::raw(" "),
        Span::styled(message.sender_name.clone(), styles::sender_style()),
        Span::raw(": "),
        Span::styled(message.text.clone(), styles::message_text_style()),
    ])
}

/// Display columns before the cursor, which differs from the char
/// index for wide characters.
fn cursor_column(state: &SessionState) -> usize {
    let text = state.input().text();
    let prefix: String = text.chars().take(state.input().cursor()).collect();
    prefix.width()
}

/// Indicator shown only while a history entry is recalled.
fn history_indicator(state: &SessionState) -> Option<String> {
    if !state.history().is_browsing() {
        return None;
    }
    Some(format!(
        "History {}/{}",
        state.history().cursor() + 1,
        state.history().len()
    ))
}

fn scroll_offset(total_lines: usize, viewport_height: usize) -> usize {
    total_lines.saturating_sub(viewport_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{history_log::HistoryLog, session_state::SessionState};
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> SessionState {
        let history =
            HistoryLog::load(dir.path().join("test.history")).expect("history should load");
        SessionState::new("C123".to_owned(), "general".to_owned(), history)
    }

    fn line_to_string(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn message_line_orders_time_sender_body() {
        let message = Message::new("1723473000.1", "alice", "hello there");

        let text = line_to_string(&message_line(&message));

        let sender_at = text.find("alice").expect("sender rendered");
        let body_at = text.find("hello there").expect("body rendered");
        assert!(sender_at < body_at);
        assert!(text.starts_with(|ch: char| ch.is_ascii_digit()));
    }

    #[test]
    fn no_indicator_while_not_browsing() {
        let dir = TempDir::new().expect("temp dir");
        let state = state(&dir);

        assert_eq!(history_indicator(&state), None);
    }

    #[test]
    fn indicator_counts_from_one_while_browsing() {
        let dir = TempDir::new().expect("temp dir");
        let mut state = state(&dir);
        state.history_mut().submit("a").expect("submit");
        state.history_mut().submit("b").expect("submit");
        state.history_mut().navigate(-1);

        assert_eq!(history_indicator(&state), Some("History 2/2".to_owned()));
    }

    #[test]
    fn log_scrolls_to_keep_the_end_visible() {
        assert_eq!(scroll_offset(50, 20), 30);
        assert_eq!(scroll_offset(5, 20), 0);
        assert_eq!(scroll_offset(20, 20), 0);
    }

    #[test]
    fn cursor_column_accounts_for_wide_characters() {
        let dir = TempDir::new().expect("temp dir");
        let mut state = state(&dir);
        state.input_mut().set_text("日本");

        // Two double-width characters occupy four columns.
        assert_eq!(cursor_column(&state), 4);
    }
}
