use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::constants::{ADMIN_GREETING, ADMIN_USER_ID, DEVICE_CLASS_USER_ID, NO_DATA_TEXT};
use crate::id::next_id;
use crate::models::Message;

/// In-memory message collection with the paired-copy exchange semantics.
///
/// Every logical send stores two records: the sender's copy and the
/// receiver's copy of the same text, with `user_id`/`to_user_id` swapped
/// and `from_me` inverted.  Messages are never updated or deleted.
#[derive(Clone)]
pub struct MessageStore {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl MessageStore {
    /// Create a store seeded with the admin's self-addressed test message.
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(vec![Message {
                id: 1,
                text: "Test Message".to_string(),
                user_id: ADMIN_USER_ID,
                to_user_id: ADMIN_USER_ID,
                from_me: false,
            }])),
        }
    }

    /// Record one logical exchange as two stored copies and return the
    /// receiver's copy.
    ///
    /// The self-copy (`from_me == true`) is appended first and therefore
    /// always carries the lower of the two freshly allocated IDs.
    pub async fn send(&self, user_id: i64, to_user_id: i64, text: &str) -> Message {
        let mut messages = self.messages.write().await;
        Self::send_locked(&mut messages, user_id, to_user_id, text)
    }

    /// Messages delivered to `user_id` that were authored by `to_user_id`,
    /// in insertion order.
    ///
    /// Two store-mutating special cases apply, in this order:
    /// 1. First contact with the admin (`to_user_id == ADMIN_USER_ID`,
    ///    empty result): the admin's greeting is synthesized through the
    ///    regular send path and the filter runs once more.  A single retry
    ///    always suffices since the new record matches the filter by
    ///    construction.
    /// 2. Device-class callers (`user_id == DEVICE_CLASS_USER_ID`) poll for
    ///    one command at a time: the result collapses to its most recent
    ///    entry, or a `NO DATA` placeholder when there is none.  This also
    ///    applies to a greeting synthesized in step 1.
    pub async fn get_messages(&self, user_id: i64, to_user_id: i64) -> Vec<Message> {
        let mut messages = self.messages.write().await;

        let mut result = Self::filter_conversation(&messages, user_id, to_user_id);

        if to_user_id == ADMIN_USER_ID && result.is_empty() {
            info!(user_id, "Synthesizing admin greeting on first contact");
            Self::send_locked(&mut messages, ADMIN_USER_ID, user_id, ADMIN_GREETING);
            result = Self::filter_conversation(&messages, user_id, to_user_id);
        }

        if user_id == DEVICE_CLASS_USER_ID {
            return match result.pop() {
                Some(last) => vec![last],
                None => vec![Message {
                    id: 0,
                    text: NO_DATA_TEXT.to_string(),
                    user_id: 0,
                    to_user_id: 0,
                    from_me: false,
                }],
            };
        }

        result
    }

    // Shared by `send` and the auto-reply inside `get_messages`, which
    // already holds the write lock.
    fn send_locked(
        messages: &mut Vec<Message>,
        user_id: i64,
        to_user_id: i64,
        text: &str,
    ) -> Message {
        let self_copy = Message {
            id: next_id(messages.iter().map(|message| message.id)),
            text: text.to_string(),
            user_id: to_user_id,
            to_user_id: user_id,
            from_me: true,
        };
        messages.push(self_copy);

        let peer_copy = Message {
            id: next_id(messages.iter().map(|message| message.id)),
            text: text.to_string(),
            user_id,
            to_user_id,
            from_me: false,
        };
        messages.push(peer_copy.clone());

        debug!(
            from = user_id,
            to = to_user_id,
            id = peer_copy.id,
            "Stored message exchange"
        );

        peer_copy
    }

    // Two-stage filter: everything delivered to the caller, then the subset
    // authored by the requested counterpart.
    fn filter_conversation(messages: &[Message], user_id: i64, to_user_id: i64) -> Vec<Message> {
        let delivered: Vec<&Message> = messages
            .iter()
            .filter(|message| message.to_user_id == user_id)
            .collect();

        delivered
            .into_iter()
            .filter(|message| message.user_id == to_user_id)
            .cloned()
            .collect()
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
