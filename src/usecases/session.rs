//! The session state machine.
//!
//! `SessionController::handle_event` is the only place session state
//! mutates. It takes one event and answers with the task requests the
//! gateway should launch, which keeps every transition unit-testable
//! without a terminal or a running event loop.

use crate::domain::{
    events::{KeyPress, SessionEvent, TaskRequest},
    session_state::{SessionError, SessionState},
};

pub struct SessionController {
    state: SessionState,
}

impl SessionController {
    pub fn new(state: SessionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Tasks launched when the session enters the loop: the first poll
    /// timer and an immediate fetch of the most recent page.
    pub fn startup_requests(&self) -> Vec<TaskRequest> {
        vec![
            TaskRequest::ScheduleTick,
            TaskRequest::Fetch {
                cursor: String::new(),
            },
        ]
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> Vec<TaskRequest> {
        let mut requests = Vec::new();

        match event {
            SessionEvent::QuitRequested => self.state.stop(),
            SessionEvent::Resized { width, height } => {
                if !self.state.is_ready() {
                    self.state.mark_ready();
                    tracing::debug!(width, height, "first layout known, session ready");
                }
                self.state.mark_dirty();
            }
            SessionEvent::Redraw => self.state.mark_dirty(),
            SessionEvent::Tick => {
                self.state.record_tick();
                // Re-arm unconditionally before the fetch outcome is
                // known; an error on one poll never stops polling.
                requests.push(TaskRequest::ScheduleTick);
                requests.push(TaskRequest::Fetch {
                    cursor: self.state.store().sync_cursor().to_owned(),
                });
            }
            SessionEvent::Key(KeyPress::Enter) => {
                if self.state.is_ready() {
                    requests.extend(self.submit());
                }
            }
            SessionEvent::Key(key) => {
                if self.state.is_ready() {
                    self.edit_input(key);
                    self.state.mark_dirty();
                }
            }
            SessionEvent::RecallPrevious => self.recall(-1),
            SessionEvent::RecallNext => self.recall(1),
            SessionEvent::FetchCompleted(Ok(batch)) => {
                if self.state.last_error().is_some() {
                    // A completed poll is proof the service is back.
                    self.state.clear_error();
                    self.state.mark_dirty();
                }
                if !batch.is_empty() && self.state.store_mut().merge(&batch) {
                    self.state.store_mut().advance_cursor(&batch);
                    self.state.mark_dirty();
                }
            }
            SessionEvent::FetchCompleted(Err(error)) => {
                tracing::warn!(error = %error, "fetch failed");
                self.state.set_error(SessionError::Fetch(error));
                self.state.mark_dirty();
            }
            SessionEvent::SendCompleted(Ok(())) => {
                // The pipeline's refresh stage is already scheduled.
            }
            SessionEvent::SendCompleted(Err(error)) => {
                tracing::warn!(error = %error, "send failed");
                self.state.set_error(SessionError::Send(error));
                self.state.mark_dirty();
            }
        }

        requests
    }

    fn submit(&mut self) -> Vec<TaskRequest> {
        let text = self.state.input().text().to_owned();
        if text.trim().is_empty() {
            return Vec::new();
        }

        // A failed history write is surfaced but never blocks the
        // send; the in-memory entry is kept either way.
        if let Err(error) = self.state.history_mut().submit(&text) {
            tracing::warn!(error = %error, "input history append failed");
            self.state.set_error(SessionError::History(error.to_string()));
        }

        self.state.input_mut().clear();
        self.state.mark_dirty();

        vec![TaskRequest::SendThenRefresh { text }]
    }

    fn recall(&mut self, direction: i32) {
        if !self.state.is_ready() {
            return;
        }

        let before = self.state.history().cursor();
        let text = self.state.history_mut().navigate(direction).to_owned();
        if self.state.history().cursor() != before {
            self.state.input_mut().set_text(&text);
            self.state.mark_dirty();
        }
    }

    fn edit_input(&mut self, key: KeyPress) {
        let input = self.state.input_mut();
        match key {
            KeyPress::Char(ch) => input.insert(ch),
            KeyPress::Backspace => input.delete_backward(),
            KeyPress::Delete => input.delete_forward(),
            KeyPress::Left => input.move_left(),
            KeyPress::Right => input.move_right(),
            KeyPress::Home => input.move_home(),
            KeyPress::End => input.move_end(),
            KeyPress::Enter => {}
        }
    }
}
