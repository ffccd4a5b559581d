//! Deduplicated, time-ordered collection of channel messages.

use std::collections::HashSet;

use super::message::Message;

/// The single point of truth for message ordering and deduplication.
///
/// Repeated polls deliver overlapping, out-of-order or entirely
/// duplicate batches; `merge` makes all of them safe to apply in any
/// arrival order. The store only ever grows — messages live for the
/// session and are discarded at exit.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    seen_ids: HashSet<String>,
    sync_cursor: String,
}

impl MessageStore {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The id of the newest message incorporated from the last fetch.
    /// Empty means "fetch the most recent page".
    pub fn sync_cursor(&self) -> &str {
        &self.sync_cursor
    }

    /// Merges a fetched batch into the store. Messages whose id was
    /// already seen are skipped, including duplicates within the batch
    /// itself. Returns true if anything was inserted, in which case
    /// the sequence has been stable-sorted ascending by timestamp.
    pub fn merge(&mut self, incoming: &[Message]) -> bool {
        let mut changed = false;

        for message in incoming {
            if self.seen_ids.contains(&message.id) {
                continue;
            }
            self.seen_ids.insert(message.id.clone());
            self.messages.push(message.clone());
            changed = true;
        }

        if changed {
            self.messages.sort_by_key(|message| message.timestamp_ms);
        }

        changed
    }

    /// Advances the sync cursor after a successful fetch. The batch is
    /// newest-first as returned by the service, so element 0 carries
    /// the newest id.
    pub fn advance_cursor(&mut self, incoming: &[Message]) {
        if let Some(newest) = incoming.first() {
            self.sync_cursor = newest.id.clone();
        }
    }
}
