//! Capability contract required from the remote chat service.

use async_trait::async_trait;

use crate::domain::{
    events::ServiceError,
    message::{ChannelInfo, RemoteMessage},
};

/// The four remote operations the session depends on. Implemented by
/// the Slack adapter and by stubs in tests; the core never sees wire
/// formats or credentials.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Channel metadata, used once at session start.
    async fn channel_info(&self, channel_id: &str) -> Result<ChannelInfo, ServiceError>;

    /// Up to `limit` messages newer than `since_cursor`, newest first.
    /// An empty cursor requests the most recent page.
    async fn fetch_history(
        &self,
        channel_id: &str,
        since_cursor: &str,
        limit: usize,
    ) -> Result<Vec<RemoteMessage>, ServiceError>;

    /// Sends one message, returning its confirmation id.
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, ServiceError>;

    /// Resolves a sender reference to a display name. Callers absorb
    /// failures with a placeholder; a miss never fails a fetch.
    async fn resolve_sender_name(&self, sender_ref: &str) -> Result<String, ServiceError>;
}
