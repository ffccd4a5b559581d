pub mod event_source;
pub mod shell;
pub mod styles;
pub mod terminal;
pub mod view;
