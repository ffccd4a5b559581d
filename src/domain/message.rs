//! Message types shared between the store, the gateway and the view.

/// Placeholder shown when sender resolution fails or the message
/// carries no sender reference.
pub const UNKNOWN_SENDER: &str = "unknown";

/// A message as returned by the remote service, before sender
/// resolution. `sender_ref` is the service-side user id and may be
/// empty for bot or system messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMessage {
    pub id: String,
    pub text: String,
    pub sender_ref: String,
}

/// Channel metadata resolved once at session start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub name: String,
}

/// A stored message, immutable once merged.
///
/// `id` is the Slack `ts` string and doubles as the dedup key. The
/// timestamp is derived from it; an unparsable id yields 0, so such
/// messages sort before everything else rather than failing the merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub sender_name: String,
    pub text: String,
    pub timestamp_ms: i64,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        sender_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let timestamp_ms = timestamp_ms_from_id(&id);
        Self {
            id,
            sender_name: sender_name.into(),
            text: text.into(),
            timestamp_ms,
        }
    }

    /// Formats the message time for display (local time, HH:MM:SS).
    pub fn format_time(&self) -> String {
        use chrono::{Local, TimeZone};

        match Local.timestamp_millis_opt(self.timestamp_ms) {
            chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
                dt.format("%H:%M:%S").to_string()
            }
            chrono::LocalResult::None => "--:--:--".to_owned(),
        }
    }
}

/// Derives a unix timestamp in milliseconds from a Slack `ts` id
/// ("1723473000.123456" is seconds with a fractional part).
fn timestamp_ms_from_id(id: &str) -> i64 {
    id.parse::<f64>()
        .map(|seconds| (seconds * 1000.0) as i64)
        .unwrap_or(0)
}
