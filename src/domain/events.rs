//! The tagged-union event stream and the controller's task outputs.
//!
//! Every concurrent activity in the session (input thread, poll timer,
//! fetch and send tasks) reports back as a `SessionEvent` on one
//! channel; the controller answers with `TaskRequest`s for the gateway
//! to launch. State is only ever touched while handling an event.

use thiserror::Error;

use super::message::Message;

/// Failures surfaced by the remote chat service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("network failure: {0}")]
    Transport(String),
    #[error("authentication failed")]
    Auth,
    #[error("rate limited by service")]
    RateLimited,
    #[error("channel not found")]
    NotFound,
}

/// A key the composer cares about. Quit and history recall are mapped
/// to their own events before reaching this level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// One event consumed by the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Poll timer fired.
    Tick,
    /// Esc or Ctrl-C.
    QuitRequested,
    /// Terminal layout dimensions became known or changed.
    Resized { width: u16, height: u16 },
    /// A key routed to the composer (Enter submits).
    Key(KeyPress),
    /// Up arrow: recall the previous history entry.
    RecallPrevious,
    /// Down arrow: recall the next history entry.
    RecallNext,
    /// Explicit request to recompute the rendered view.
    Redraw,
    /// A fetch task finished, with resolved messages or the failure.
    FetchCompleted(Result<Vec<Message>, ServiceError>),
    /// The send stage of a send-then-refresh pipeline finished.
    SendCompleted(Result<(), ServiceError>),
}

/// A unit of concurrent work the controller asks the gateway to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRequest {
    /// Fetch messages newer than `cursor` ("" = most recent page).
    Fetch { cursor: String },
    /// Send `text`, then after the settle delay fetch the most recent
    /// page regardless of the send outcome.
    SendThenRefresh { text: String },
    /// Re-arm the poll timer.
    ScheduleTick,
}
