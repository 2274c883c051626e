//! Chat message record and delivery plan
//!
//! `ChatMessage` is the immutable unit of room history; `DeliveryPlan` is how
//! the core hands a broadcast back to the transport layer as plain data.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::ClientId;

/// One chat message, as stored in room history and sent on the wire.
///
/// Created only by `ChatRoom::post_message`; never mutated afterwards.
/// Serializes with an ISO-8601 timestamp string.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Message body (may be empty; the server is permissive)
    pub content: String,
    /// Display name of the author (a funny name, "Anonymous", or the AI)
    pub sender: String,
    /// Creation instant, supplied by the caller
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(content: String, sender: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            content,
            sender,
            timestamp,
        }
    }
}

/// A broadcast the transport layer must carry out: one message and the
/// set of members who should receive it.
///
/// The core never touches a socket; it returns these and the adapter
/// fans them out however its transport works.
#[derive(Debug, Clone)]
pub struct DeliveryPlan {
    pub message: ChatMessage,
    pub recipients: HashSet<ClientId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_message_serializes_iso8601() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let msg = ChatMessage::new("hello".to_string(), "Silly Goose".to_string(), ts);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"content\":\"hello\""));
        assert!(json.contains("\"sender\":\"Silly Goose\""));
        assert!(json.contains("2024-05-01T12:30:00"));
    }
}
