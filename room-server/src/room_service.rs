use std::sync::Arc;
use tracing::info;

use crate::websocket::connection::{ConnectionId, ConnectionManager};
use room_core::{Room, RoomRegistry, WordSource};
use room_types::{LetterMark, RoomError, RoomSnapshot, ServerMessage};

/// Translates gateway requests into room mutations and the resulting
/// broadcasts.
///
/// Every mutation runs to completion inside the registry's per-room
/// scope. Outbound messages are staged while that scope is held and
/// flushed afterwards through unbounded per-connection channels, so a
/// slow peer can never stall a room and no guard is held across an await.
pub struct RoomService {
    registry: RoomRegistry,
    words: Arc<dyn WordSource>,
    connections: Arc<ConnectionManager>,
}

impl RoomService {
    pub fn new(
        registry: RoomRegistry,
        words: Arc<dyn WordSource>,
        connections: Arc<ConnectionManager>,
    ) -> Self {
        Self {
            registry,
            words,
            connections,
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Open a room with the requester as host and sole member. Replies to
    /// the requester only.
    pub async fn create_room(
        &self,
        requester: ConnectionId,
        name: Option<String>,
        word: Option<String>,
    ) -> ServerMessage {
        let id = requester.as_uuid();
        let code = self
            .registry
            .create(|code| Room::create(code.to_string(), id, name, word));

        self.connections.join_room(requester, &code).await;
        info!("Room {} created by {}", code, requester);

        match self.registry.read(&code, Room::snapshot) {
            Some(room_state) => ServerMessage::RoomCreated { code, room_state },
            // the room vanished between insert and read; report it gone
            None => ServerMessage::Error {
                error: RoomError::RoomNotFound,
            },
        }
    }

    /// Add the requester to an open room and tell every member.
    pub async fn join_room(
        &self,
        requester: ConnectionId,
        code: &str,
        name: Option<String>,
    ) -> Result<RoomSnapshot, RoomError> {
        let id = requester.as_uuid();

        let snapshot = self
            .registry
            .update(code, |room| room.join(id, name).map(|_| room.snapshot()))
            .ok_or(RoomError::RoomNotFound)??;

        self.connections.join_room(requester, code).await;
        info!("Connection {} joined room {}", requester, code);

        self.connections
            .send_to_room(
                code,
                ServerMessage::RoomUpdated {
                    room_state: snapshot.clone(),
                },
            )
            .await;

        Ok(snapshot)
    }

    /// Begin a round. The broadcast carries the snapshot, never the
    /// secret.
    pub async fn start_game(
        &self,
        requester: ConnectionId,
        code: &str,
        word: Option<String>,
    ) -> Result<(), RoomError> {
        let id = requester.as_uuid();
        let words = self.words.clone();

        let snapshot = self
            .registry
            .update(code, |room| {
                room.start(id, word, words.as_ref()).map(|_| room.snapshot())
            })
            .ok_or(RoomError::RoomNotFound)??;

        info!("Room {} started a round", code);
        self.connections
            .send_to_room(code, ServerMessage::GameStarted { room_state: snapshot })
            .await;

        Ok(())
    }

    /// Score a guess, announce the player's progress, and close the round
    /// once anyone has solved. Returns the feedback for the requester's
    /// acknowledgement.
    pub async fn submit_guess(
        &self,
        requester: ConnectionId,
        code: &str,
        guess: &str,
    ) -> Result<Vec<LetterMark>, RoomError> {
        let id = requester.as_uuid();

        struct Staged {
            feedback: Vec<LetterMark>,
            progress: ServerMessage,
            completion: Option<ServerMessage>,
        }

        let staged = self
            .registry
            .update(code, |room| -> Result<Staged, RoomError> {
                let feedback = room.submit_guess(id, guess)?;

                let progress = ServerMessage::PlayerUpdate {
                    player_id: id,
                    snapshot: room.player_detail(id).ok_or(RoomError::NotAMember)?,
                    room_state: room.snapshot(),
                };

                let winners = room.solved_ranking();
                let completion = if winners.is_empty() {
                    None
                } else {
                    room.finish_round()
                        .map(|secret| ServerMessage::RoundComplete { winners, secret })
                };

                Ok(Staged {
                    feedback,
                    progress,
                    completion,
                })
            })
            .ok_or(RoomError::RoomNotFound)??;

        self.connections.send_to_room(code, staged.progress).await;
        if let Some(completion) = staged.completion {
            info!("Room {} round complete", code);
            self.connections.send_to_room(code, completion).await;
        }

        Ok(staged.feedback)
    }

    /// Remove the requester from the room. Destroys an emptied room;
    /// otherwise announces the new membership (and host, if the seat
    /// moved) in one snapshot.
    pub async fn leave_room(&self, requester: ConnectionId, code: &str) {
        let id = requester.as_uuid();

        let Some((departure, snapshot)) = self.registry.update(code, |room| {
            let departure = room.remove_player(id);
            (departure, room.snapshot())
        }) else {
            // unknown code: nothing to leave
            return;
        };

        self.connections.leave_room(requester, code).await;
        info!("Connection {} left room {}", requester, code);

        if departure.room_empty {
            self.registry.remove(code);
            info!("Room {} destroyed, last member left", code);
            return;
        }

        if let Some(new_host) = departure.new_host {
            info!("Room {} host seat moved to {}", code, new_host);
        }

        self.connections
            .send_to_room(code, ServerMessage::RoomUpdated { room_state: snapshot })
            .await;
    }

    /// Mark the dropped connection unconnected in every room holding it.
    /// Records are kept; only an explicit leave removes a player.
    pub async fn handle_disconnect(&self, requester: ConnectionId) {
        let id = requester.as_uuid();

        let mut touched: Vec<(String, RoomSnapshot)> = Vec::new();
        self.registry.for_each_mut(|room| {
            if room.mark_disconnected(id) {
                touched.push((room.code.clone(), room.snapshot()));
            }
        });

        for (code, room_state) in touched {
            info!("Connection {} marked unconnected in room {}", requester, code);
            self.connections
                .send_to_room(&code, ServerMessage::RoomUpdated { room_state })
                .await;
        }
    }
}
