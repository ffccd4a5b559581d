//! The aggregate session state mutated by the controller.

use thiserror::Error;

use super::{
    events::ServiceError, history_log::HistoryLog, input_state::InputState,
    message_store::MessageStore,
};

/// An error worth showing to the user. Sticky: it stays until replaced
/// by the next error or cleared by a later successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("fetching messages failed: {0}")]
    Fetch(ServiceError),
    #[error("sending message failed: {0}")]
    Send(ServiceError),
    #[error("writing input history failed: {0}")]
    History(String),
}

#[derive(Debug)]
pub struct SessionState {
    channel_id: String,
    channel_name: String,
    store: MessageStore,
    history: HistoryLog,
    input: InputState,
    last_error: Option<SessionError>,
    ready: bool,
    dirty: bool,
    running: bool,
    tick_count: u64,
}

impl SessionState {
    pub fn new(channel_id: String, channel_name: String, history: HistoryLog) -> Self {
        Self {
            channel_id,
            channel_name,
            store: MessageStore::default(),
            history,
            input: InputState::default(),
            last_error: None,
            ready: false,
            dirty: false,
            running: true,
            tick_count: 0,
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MessageStore {
        &mut self.store
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryLog {
        &mut self.history
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn set_error(&mut self, error: SessionError) {
        self.last_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// False until the first layout dimensions are known.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Consumes the dirty flag; the shell redraws when this was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Diagnostic poll counter, not load-bearing.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn record_tick(&mut self) {
        self.tick_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> SessionState {
        let history =
            HistoryLog::load(dir.path().join("h.history")).expect("history should load");
        SessionState::new("C123".to_owned(), "general".to_owned(), history)
    }

    #[test]
    fn starts_running_not_ready_not_dirty() {
        let dir = TempDir::new().expect("temp dir");
        let state = state(&dir);

        assert!(state.is_running());
        assert!(!state.is_ready());
        assert_eq!(state.last_error(), None);
        assert_eq!(state.tick_count(), 0);
    }

    #[test]
    fn take_dirty_consumes_the_flag() {
        let dir = TempDir::new().expect("temp dir");
        let mut state = state(&dir);

        state.mark_dirty();

        assert!(state.take_dirty());
        assert!(!state.take_dirty());
    }

    #[test]
    fn errors_replace_rather_than_accumulate() {
        let dir = TempDir::new().expect("temp dir");
        let mut state = state(&dir);

        state.set_error(SessionError::Fetch(ServiceError::Auth));
        state.set_error(SessionError::Send(ServiceError::RateLimited));

        assert_eq!(
            state.last_error(),
            Some(&SessionError::Send(ServiceError::RateLimited))
        );
    }
}
