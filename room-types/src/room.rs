use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Per-position result of scoring one guess letter against the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LetterMark {
    Correct, // right letter in the right position
    Present, // letter occurs elsewhere and is not yet consumed
    Absent,  // no remaining occurrence in the secret
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRecord {
    pub text: String,
    pub feedback: Vec<LetterMark>,
    pub at: String, // RFC 3339 string
}

/// Per-player projection inside a room snapshot. Guess contents stay
/// private to their owner; only the count is shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerSummary {
    pub id: Uuid,
    pub name: String,
    pub guess_count: usize,
    pub solved_at: Option<String>,
    pub connected: bool,
}

/// Full record for a single player, sent with their own updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerDetail {
    pub id: Uuid,
    pub name: String,
    pub guesses: Vec<GuessRecord>,
    pub solved_at: Option<String>,
    pub connected: bool,
}

/// The broadcast view of a room. Never carries the secret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomSnapshot {
    pub code: String,
    pub host: Uuid,
    pub started: bool,
    pub player_count: usize,
    pub players: Vec<PlayerSummary>,
    pub created_at: String, // RFC 3339 string
    pub started_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WinnerEntry {
    pub id: Uuid,
    pub name: String,
    pub solved_at: String,
    pub guess_count: usize,
}
