//! Basic type definitions for the chat server
//!
//! Provides newtype wrappers for type safety:
//! - `ClientId`: UUID-based unique member handle
//! - `RoomCode`: 6-character room code from a fixed 32-symbol alphabet

use uuid::Uuid;

use crate::rng::IndexPicker;

/// Alphabet for room codes: uppercase letters and digits with the
/// visually ambiguous glyphs 0/O/1/I excluded (32 symbols).
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of characters in a room code.
pub const ROOM_CODE_LEN: usize = 6;

/// Unique member handle (newtype pattern)
///
/// Wraps a UUID v4 for type-safe identification of one connected
/// participant. Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// Create a new random client ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room code (6 characters from [`ROOM_CODE_ALPHABET`])
///
/// Used to identify and join chat rooms.
/// Generated randomly or parsed from user input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode(pub String);

impl RoomCode {
    /// Generate a new random room code
    ///
    /// Each character is drawn from the alphabet via the supplied picker,
    /// so tests can force deterministic codes.
    pub fn generate(rng: &mut dyn IndexPicker) -> Self {
        let code: String = (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_ALPHABET[rng.pick_index(ROOM_CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Create a RoomCode from a string (converts to uppercase)
    pub fn from_string(code: String) -> Self {
        Self(code.to_uppercase())
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
