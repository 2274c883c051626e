//! RoomRegistry: the table of active rooms
//!
//! Exclusive owner of every `ChatRoom`. Generates collision-free room codes
//! and routes lookups; removal on empty membership is driven by the caller.

use std::collections::HashMap;

use crate::room::ChatRoom;
use crate::rng::IndexPicker;
use crate::types::RoomCode;

/// Registry of active rooms, keyed by room code.
///
/// Codes are unique among active rooms; a destroyed room's code may be
/// reassigned later. Constructed once at process start and handed to the
/// actor that serializes access.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, ChatRoom>,
}

impl RoomRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty room under a freshly generated code
    ///
    /// Rejection-samples the code space (32^6) against the active set.
    /// Collisions are vanishingly rare but the retry loop is what makes
    /// uniqueness a guarantee rather than an assumption.
    pub fn create_room(&mut self, rng: &mut dyn IndexPicker) -> RoomCode {
        let code = loop {
            let code = RoomCode::generate(rng);
            if !self.rooms.contains_key(&code) {
                break code;
            }
        };
        self.rooms.insert(code.clone(), ChatRoom::new());
        code
    }

    /// Look up a room; absent codes are a normal outcome
    pub fn get_room(&self, code: &RoomCode) -> Option<&ChatRoom> {
        self.rooms.get(code)
    }

    /// Mutable room lookup
    pub fn get_room_mut(&mut self, code: &RoomCode) -> Option<&mut ChatRoom> {
        self.rooms.get_mut(code)
    }

    /// Delete a room; removing an absent code is a no-op
    pub fn remove_room(&mut self, code: &RoomCode) {
        self.rooms.remove(code);
    }

    /// Number of active rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Check whether no rooms are active
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::testing::SeqPicker;
    use crate::rng::ThreadRngPicker;
    use crate::types::{ROOM_CODE_ALPHABET, ROOM_CODE_LEN};
    use std::collections::HashSet;

    #[test]
    fn test_create_room_yields_distinct_valid_codes() {
        let mut registry = RoomRegistry::new();
        let mut rng = ThreadRngPicker;
        let mut codes = HashSet::new();
        for _ in 0..100 {
            let code = registry.create_room(&mut rng);
            assert_eq!(code.0.len(), ROOM_CODE_LEN);
            assert!(code.0.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)));
            assert!(codes.insert(code), "duplicate room code");
        }
        assert_eq!(registry.len(), 100);
    }

    #[test]
    fn test_create_room_retries_on_collision() {
        let mut registry = RoomRegistry::new();
        // All-zero indices produce "AAAAAA"; the second create collides and
        // must keep sampling until the sequence diverges.
        let first = registry.create_room(&mut SeqPicker::zeros());
        assert_eq!(first.0, "AAAAAA");

        let mut rng = SeqPicker::new(vec![0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0]);
        let second = registry.create_room(&mut rng);
        assert_eq!(second.0, "BAAAAA");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_get_room_absent_is_none() {
        let registry = RoomRegistry::new();
        assert!(registry.get_room(&RoomCode::from_string("XXXXXX".into())).is_none());
    }

    #[test]
    fn test_remove_room_idempotent() {
        let mut registry = RoomRegistry::new();
        let code = registry.create_room(&mut ThreadRngPicker);
        assert!(registry.get_room(&code).is_some());

        registry.remove_room(&code);
        assert!(registry.get_room(&code).is_none());
        assert!(registry.is_empty());

        // Absent removal is a no-op
        registry.remove_room(&code);
        assert!(registry.is_empty());
    }
}
