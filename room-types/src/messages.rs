use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{LetterMark, PlayerDetail, RoomError, RoomSnapshot, WinnerEntry};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    CreateRoom {
        name: Option<String>,
        word: Option<String>,
    },
    JoinRoom {
        code: String,
        name: Option<String>,
    },
    StartGame {
        code: String,
        word: Option<String>,
    },
    SubmitGuess {
        code: String,
        guess: String,
    },
    LeaveRoom {
        code: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    /// Delivered to the creating connection only.
    RoomCreated {
        code: String,
        room_state: RoomSnapshot,
    },
    /// Direct acknowledgement of a successful join.
    JoinAccepted {
        room_state: RoomSnapshot,
    },
    /// Direct acknowledgement of a successful round start.
    StartAccepted,
    /// Direct acknowledgement of an accepted guess.
    GuessAccepted {
        feedback: Vec<LetterMark>,
    },
    /// Broadcast whenever membership or connectivity changes.
    RoomUpdated {
        room_state: RoomSnapshot,
    },
    /// Broadcast when a round begins. The secret is not included.
    GameStarted {
        room_state: RoomSnapshot,
    },
    /// Broadcast after every accepted guess.
    PlayerUpdate {
        player_id: Uuid,
        snapshot: PlayerDetail,
        room_state: RoomSnapshot,
    },
    /// Broadcast once at least one player has solved. The only message
    /// that reveals the secret.
    RoundComplete {
        winners: Vec<WinnerEntry>,
        secret: String,
    },
    /// Delivered to the offending requester only.
    Error {
        error: RoomError,
    },
}
