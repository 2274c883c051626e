//! ChatRoom: membership, nicknames, history, and broadcast planning
//!
//! Owns one room's state: the member set, the funny-name pool, and the
//! bounded message log. Every operation is synchronous and returns data;
//! delivery to actual connections is the transport layer's job.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};

use crate::chat::{ChatMessage, DeliveryPlan};
use crate::rng::IndexPicker;
use crate::types::ClientId;

/// Pool of display names handed out to joining members.
pub const FUNNY_NAMES: [&str; 20] = [
    "Silly Goose",
    "Wacky Wombat",
    "Crazy Cat",
    "Bubbly Bear",
    "Jolly Jellyfish",
    "Sassy Sloth",
    "Dizzy Dolphin",
    "Cheeky Monkey",
    "Nerdy Narwhal",
    "Funky Flamingo",
    "Quirky Quokka",
    "Zany Zebra",
    "Playful Penguin",
    "Dapper Duck",
    "Giggly Giraffe",
    "Mischievous Mongoose",
    "Bouncy Bunny",
    "Charming Chinchilla",
    "Radiant Raccoon",
    "Dizzy Dingo",
];

/// Fallback display name once the pool is exhausted, and the sender name
/// used for a handle the room does not know.
pub const FALLBACK_NAME: &str = "Anonymous";

/// Display name the scripted AI signs its messages with.
pub const AI_NAME: &str = "ChatGPT-Mini";

/// Prefix that triggers the scripted AI echo (case-sensitive).
const AI_TRIGGER: &str = "ai:";

/// Maximum number of messages kept in room history (FIFO eviction).
const HISTORY_LIMIT: usize = 100;

/// One chat room: members, their assigned names, and the last
/// [`HISTORY_LIMIT`] messages.
#[derive(Debug, Default)]
pub struct ChatRoom {
    /// Current members
    members: HashSet<ClientId>,
    /// Member handle -> assigned display name
    names: HashMap<ClientId, String>,
    /// Names currently taken, for fast exclusion during allocation
    assigned_names: HashSet<String>,
    /// Bounded message log, oldest first
    messages: VecDeque<ChatMessage>,
}

impl ChatRoom {
    /// Create an empty room
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a member and assign it a display name
    ///
    /// Picks uniformly among the funny names not taken in this room; once
    /// all 20 are taken, every further member gets [`FALLBACK_NAME`]
    /// (degraded mode: uniqueness no longer holds, joins never fail).
    /// Re-admitting a present handle keeps its existing name.
    pub fn add_member(&mut self, client_id: ClientId, rng: &mut dyn IndexPicker) -> String {
        if let Some(name) = self.names.get(&client_id) {
            return name.clone();
        }
        self.members.insert(client_id);
        let name = self.allocate_name(rng);
        self.names.insert(client_id, name.clone());
        name
    }

    /// Remove a member and release its display name back to the pool
    ///
    /// Idempotent: unknown handles are a no-op.
    pub fn remove_member(&mut self, client_id: ClientId) {
        self.members.remove(&client_id);
        if let Some(name) = self.names.remove(&client_id) {
            self.assigned_names.remove(&name);
        }
    }

    /// Append a message and plan its broadcast
    ///
    /// The human message goes to everyone except the sender. If the content
    /// starts with `ai:`, a scripted echo is appended as well and goes to
    /// everyone. Plans come back in that order.
    pub fn post_message(
        &mut self,
        sender_id: ClientId,
        content: String,
        now: DateTime<Utc>,
    ) -> Vec<DeliveryPlan> {
        let sender_name = self
            .names
            .get(&sender_id)
            .cloned()
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        let mut plans = Vec::with_capacity(2);

        let ai_reply = ai_response(&content);

        let message = self.push_message(ChatMessage::new(content, sender_name, now));
        let mut recipients: HashSet<ClientId> = self.members.clone();
        recipients.remove(&sender_id);
        plans.push(DeliveryPlan {
            message,
            recipients,
        });

        if let Some(reply) = ai_reply {
            let message = self.push_message(ChatMessage::new(reply, AI_NAME.to_string(), now));
            // The AI has no connection to exclude; everyone gets the echo.
            plans.push(DeliveryPlan {
                message,
                recipients: self.members.clone(),
            });
        }

        plans
    }

    /// Current message log, oldest first
    pub fn history(&self) -> &VecDeque<ChatMessage> {
        &self.messages
    }

    /// Check whether the room has no members left
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Get the number of members in the room
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Look up a member's display name
    pub fn display_name(&self, client_id: ClientId) -> Option<&str> {
        self.names.get(&client_id).map(String::as_str)
    }

    /// Append to the log, evicting the oldest entry past the limit
    fn push_message(&mut self, message: ChatMessage) -> ChatMessage {
        self.messages.push_back(message.clone());
        if self.messages.len() > HISTORY_LIMIT {
            self.messages.pop_front();
        }
        message
    }

    /// Pick an unassigned funny name, or fall back to [`FALLBACK_NAME`]
    fn allocate_name(&mut self, rng: &mut dyn IndexPicker) -> String {
        let available: Vec<&str> = FUNNY_NAMES
            .iter()
            .copied()
            .filter(|name| !self.assigned_names.contains(*name))
            .collect();
        if available.is_empty() {
            return FALLBACK_NAME.to_string();
        }
        let name = available[rng.pick_index(available.len())].to_string();
        self.assigned_names.insert(name.clone());
        name
    }
}

/// Scripted AI echo: triggers on the exact `ai:` prefix and reflects the
/// trimmed remainder back in a fixed template. Pure string transform.
fn ai_response(content: &str) -> Option<String> {
    content
        .strip_prefix(AI_TRIGGER)
        .map(|rest| format!("I received your message: \"{}\"", rest.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::testing::SeqPicker;
    use crate::rng::ThreadRngPicker;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_add_member_assigns_funny_name() {
        let mut room = ChatRoom::new();
        let name = room.add_member(ClientId::new(), &mut ThreadRngPicker);
        assert!(FUNNY_NAMES.contains(&name.as_str()));
        assert_eq!(room.member_count(), 1);
    }

    #[test]
    fn test_names_unique_up_to_pool_size() {
        let mut room = ChatRoom::new();
        let mut rng = ThreadRngPicker;
        let mut seen = HashSet::new();
        for _ in 0..FUNNY_NAMES.len() {
            let name = room.add_member(ClientId::new(), &mut rng);
            assert!(seen.insert(name), "duplicate name before pool exhaustion");
        }
    }

    #[test]
    fn test_pool_exhaustion_falls_back_to_anonymous() {
        let mut room = ChatRoom::new();
        let mut rng = ThreadRngPicker;
        for _ in 0..FUNNY_NAMES.len() {
            room.add_member(ClientId::new(), &mut rng);
        }
        // 21st member and beyond get the fallback, repeatedly, without error
        assert_eq!(room.add_member(ClientId::new(), &mut rng), FALLBACK_NAME);
        assert_eq!(room.add_member(ClientId::new(), &mut rng), FALLBACK_NAME);
    }

    #[test]
    fn test_freed_name_recovers_after_exhaustion() {
        let mut room = ChatRoom::new();
        let mut ids = Vec::new();
        for _ in 0..FUNNY_NAMES.len() {
            let id = ClientId::new();
            ids.push(id);
            room.add_member(id, &mut SeqPicker::zeros());
        }
        assert_eq!(room.add_member(ClientId::new(), &mut SeqPicker::zeros()), FALLBACK_NAME);

        // Index 0 picked the first available name each time, so ids[0]
        // holds "Silly Goose"; freeing it makes it the next pick again.
        room.remove_member(ids[0]);
        let name = room.add_member(ClientId::new(), &mut SeqPicker::zeros());
        assert_eq!(name, "Silly Goose");
    }

    #[test]
    fn test_removed_members_name_is_reallocated() {
        let mut room = ChatRoom::new();
        // Index 0 always picks the first available name
        let first = ClientId::new();
        let name = room.add_member(first, &mut SeqPicker::zeros());
        assert_eq!(name, "Silly Goose");

        room.remove_member(first);

        // Freed name is immediately available again
        let name = room.add_member(ClientId::new(), &mut SeqPicker::zeros());
        assert_eq!(name, "Silly Goose");
    }

    #[test]
    fn test_remove_member_idempotent() {
        let mut room = ChatRoom::new();
        let id = ClientId::new();
        room.add_member(id, &mut ThreadRngPicker);
        room.remove_member(id);
        assert!(room.is_empty());
        // Repeated and unknown removals are no-ops
        room.remove_member(id);
        room.remove_member(ClientId::new());
        assert!(room.is_empty());
        assert_eq!(room.history().len(), 0);
    }

    #[test]
    fn test_readmitting_member_keeps_name() {
        let mut room = ChatRoom::new();
        let id = ClientId::new();
        let name = room.add_member(id, &mut ThreadRngPicker);
        let again = room.add_member(id, &mut ThreadRngPicker);
        assert_eq!(name, again);
        assert_eq!(room.member_count(), 1);
    }

    #[test]
    fn test_plain_message_single_plan_excludes_sender() {
        let mut room = ChatRoom::new();
        let mut rng = ThreadRngPicker;
        let alice = ClientId::new();
        let bob = ClientId::new();
        let carol = ClientId::new();
        let alice_name = room.add_member(alice, &mut rng);
        room.add_member(bob, &mut rng);
        room.add_member(carol, &mut rng);

        let plans = room.post_message(alice, "hello".to_string(), now());

        assert_eq!(plans.len(), 1);
        let plan = &plans[0];
        assert_eq!(plan.message.content, "hello");
        assert_eq!(plan.message.sender, alice_name);
        assert!(!plan.recipients.contains(&alice));
        assert!(plan.recipients.contains(&bob));
        assert!(plan.recipients.contains(&carol));
        assert_eq!(room.history().len(), 1);
    }

    #[test]
    fn test_ai_trigger_produces_two_plans() {
        let mut room = ChatRoom::new();
        let mut rng = ThreadRngPicker;
        let alice = ClientId::new();
        let bob = ClientId::new();
        room.add_member(alice, &mut rng);
        room.add_member(bob, &mut rng);

        let plans = room.post_message(alice, "ai: ping".to_string(), now());

        assert_eq!(plans.len(), 2);
        // Human message first, sender excluded
        assert_eq!(plans[0].message.content, "ai: ping");
        assert!(!plans[0].recipients.contains(&alice));
        // AI echo second, no exclusions
        assert_eq!(plans[1].message.sender, AI_NAME);
        assert!(plans[1].message.content.contains("ping"));
        assert!(plans[1].recipients.contains(&alice));
        assert!(plans[1].recipients.contains(&bob));
        // Both messages land in history
        assert_eq!(room.history().len(), 2);
    }

    #[test]
    fn test_ai_trigger_is_prefix_and_case_sensitive() {
        assert_eq!(
            ai_response("ai:  hello  "),
            Some("I received your message: \"hello\"".to_string())
        );
        assert_eq!(ai_response("ai:"), Some("I received your message: \"\"".to_string()));
        assert_eq!(ai_response("AI: hello"), None);
        assert_eq!(ai_response("say ai: hello"), None);
        assert_eq!(ai_response("hello"), None);
    }

    #[test]
    fn test_history_capped_fifo() {
        let mut room = ChatRoom::new();
        let id = ClientId::new();
        room.add_member(id, &mut ThreadRngPicker);

        for i in 0..=HISTORY_LIMIT {
            room.post_message(id, format!("msg-{i}"), now());
        }

        let history = room.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        // Oldest evicted, order preserved
        assert_eq!(history.front().unwrap().content, "msg-1");
        assert_eq!(history.back().unwrap().content, format!("msg-{HISTORY_LIMIT}"));
        let contents: Vec<_> = history.iter().map(|m| m.content.clone()).collect();
        for (i, content) in contents.iter().enumerate() {
            assert_eq!(content, &format!("msg-{}", i + 1));
        }
    }

    #[test]
    fn test_message_from_unknown_handle_signed_anonymous() {
        let mut room = ChatRoom::new();
        let member = ClientId::new();
        room.add_member(member, &mut ThreadRngPicker);

        let plans = room.post_message(ClientId::new(), "hi".to_string(), now());
        assert_eq!(plans[0].message.sender, FALLBACK_NAME);
        // Member still receives it
        assert!(plans[0].recipients.contains(&member));
    }

    #[test]
    fn test_empty_content_accepted() {
        let mut room = ChatRoom::new();
        let id = ClientId::new();
        room.add_member(id, &mut ThreadRngPicker);
        let plans = room.post_message(id, String::new(), now());
        assert_eq!(plans.len(), 1);
        assert_eq!(room.history().len(), 1);
    }
}
