pub mod events;
pub mod history_log;
pub mod input_state;
pub mod message;
pub mod message_store;
pub mod session_state;
