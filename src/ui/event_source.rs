//! Terminal input producer: a dedicated thread blocks on crossterm
//! and forwards mapped events into the session channel.

use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::events::{KeyPress, SessionEvent};

/// Spawns the input thread. It exits on read failure or once the
/// session consumer has gone away.
pub fn spawn_input_thread(events: UnboundedSender<SessionEvent>) {
    thread::spawn(move || loop {
        let raw = match event::read() {
            Ok(raw) => raw,
            Err(error) => {
                tracing::error!(error = %error, "terminal event read failed, input stops");
                return;
            }
        };

        if let Some(mapped) = map_event(raw) {
            if events.send(mapped).is_err() {
                return;
            }
        }
    });
}

fn map_event(raw: Event) -> Option<SessionEvent> {
    match raw {
        Event::Key(key) => map_key(key),
        Event::Resize(width, height) => Some(SessionEvent::Resized { width, height }),
        _ => None,
    }
}

/// Quit and history recall get their own events; everything else the
/// composer understands passes through as a `KeyPress`.
fn map_key(key: KeyEvent) -> Option<SessionEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(SessionEvent::QuitRequested),
            KeyCode::Char('l') => Some(SessionEvent::Redraw),
            _ => None,
        };
    }

    if key.code == KeyCode::Esc {
        return Some(SessionEvent::QuitRequested);
    }

    match key.code {
        KeyCode::Up => Some(SessionEvent::RecallPrevious),
        KeyCode::Down => Some(SessionEvent::RecallNext),
        KeyCode::Enter => Some(SessionEvent::Key(KeyPress::Enter)),
        KeyCode::Backspace => Some(SessionEvent::Key(KeyPress::Backspace)),
        KeyCode::Delete => Some(SessionEvent::Key(KeyPress::Delete)),
        KeyCode::Left => Some(SessionEvent::Key(KeyPress::Left)),
        KeyCode::Right => Some(SessionEvent::Key(KeyPress::Right)),
        KeyCode::Home => Some(SessionEvent::Key(KeyPress::Home)),
        KeyCode::End => Some(SessionEvent::Key(KeyPress::End)),
        KeyCode::Char(ch) => Some(SessionEvent::Key(KeyPress::Char(ch))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn esc_maps_to_quit() {
        assert_eq!(map_key(press(KeyCode::Esc)), Some(SessionEvent::QuitRequested));
    }

    #[test]
    fn ctrl_c_maps_to_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert_eq!(map_key(key), Some(SessionEvent::QuitRequested));
    }

    #[test]
    fn ctrl_l_requests_a_redraw() {
        let key = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL);

        assert_eq!(map_key(key), Some(SessionEvent::Redraw));
    }

    #[test]
    fn other_ctrl_chords_are_ignored() {
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);

        assert_eq!(map_key(key), None);
    }

    #[test]
    fn plain_c_is_composer_input() {
        assert_eq!(
            map_key(press(KeyCode::Char('c'))),
            Some(SessionEvent::Key(KeyPress::Char('c')))
        );
    }

    #[test]
    fn arrows_map_to_history_recall() {
        assert_eq!(map_key(press(KeyCode::Up)), Some(SessionEvent::RecallPrevious));
        assert_eq!(map_key(press(KeyCode::Down)), Some(SessionEvent::RecallNext));
    }

    #[test]
    fn enter_maps_to_submit_key() {
        assert_eq!(
            map_key(press(KeyCode::Enter)),
            Some(SessionEvent::Key(KeyPress::Enter))
        );
    }

    #[test]
    fn release_events_are_dropped() {
        let mut key = press(KeyCode::Char('x'));
        key.kind = KeyEventKind::Release;

        assert_eq!(map_key(key), None);
    }

    #[test]
    fn resize_carries_dimensions() {
        assert_eq!(
            map_event(Event::Resize(80, 24)),
            Some(SessionEvent::Resized {
                width: 80,
                height: 24
            })
        );
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(map_key(press(KeyCode::F(5))), None);
    }
}
