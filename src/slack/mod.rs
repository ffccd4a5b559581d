pub mod api;

pub use api::SlackClient;
