use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Everything a room operation can reject a request with. Reported on the
/// requester's acknowledgement channel only, never broadcast, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoomError {
    #[error("room not found")]
    RoomNotFound,
    #[error("game already started")]
    GameAlreadyStarted,
    #[error("round already started")]
    AlreadyStarted,
    #[error("only the host can start a round")]
    NotHost,
    #[error("no round in progress")]
    NotStarted,
    #[error("guess length does not match the secret word")]
    InvalidLength,
    #[error("not a member of this room")]
    NotAMember,
    #[error("malformed request")]
    BadRequest,
}
