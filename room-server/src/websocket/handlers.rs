use std::sync::Arc;
use tracing::info;

use crate::room_service::RoomService;
use crate::websocket::connection::{ConnectionId, ConnectionManager};
use room_types::{ClientMessage, RoomError, ServerMessage};

/// Per-connection dispatcher: maps each client request to a room service
/// call and sends the direct acknowledgement (or error) back to the
/// requester alone. Broadcasts are the service's job.
#[derive(Clone)]
pub struct MessageHandler {
    connection_id: ConnectionId,
    connection_manager: Arc<ConnectionManager>,
    room_service: Arc<RoomService>,
}

impl MessageHandler {
    pub fn new(
        connection_id: ConnectionId,
        connection_manager: Arc<ConnectionManager>,
        room_service: Arc<RoomService>,
    ) -> Self {
        Self {
            connection_id,
            connection_manager,
            room_service,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub async fn handle_message(&self, message: ClientMessage) -> Result<(), String> {
        match message {
            ClientMessage::CreateRoom { name, word } => self.handle_create_room(name, word).await,
            ClientMessage::JoinRoom { code, name } => self.handle_join_room(code, name).await,
            ClientMessage::StartGame { code, word } => self.handle_start_game(code, word).await,
            ClientMessage::SubmitGuess { code, guess } => {
                self.handle_submit_guess(code, guess).await
            }
            ClientMessage::LeaveRoom { code } => self.handle_leave_room(code).await,
        }
    }

    pub async fn handle_disconnect(&self) {
        info!("Handling disconnect for connection {}", self.connection_id);
        self.room_service.handle_disconnect(self.connection_id).await;
    }

    async fn handle_create_room(
        &self,
        name: Option<String>,
        word: Option<String>,
    ) -> Result<(), String> {
        let reply = self
            .room_service
            .create_room(self.connection_id, name, word)
            .await;
        self.send_message(reply).await
    }

    async fn handle_join_room(&self, code: String, name: Option<String>) -> Result<(), String> {
        match self
            .room_service
            .join_room(self.connection_id, &code, name)
            .await
        {
            Ok(room_state) => {
                self.send_message(ServerMessage::JoinAccepted { room_state })
                    .await
            }
            Err(error) => self.send_error(error).await,
        }
    }

    async fn handle_start_game(&self, code: String, word: Option<String>) -> Result<(), String> {
        match self
            .room_service
            .start_game(self.connection_id, &code, word)
            .await
        {
            Ok(()) => self.send_message(ServerMessage::StartAccepted).await,
            Err(error) => self.send_error(error).await,
        }
    }

    async fn handle_submit_guess(&self, code: String, guess: String) -> Result<(), String> {
        match self
            .room_service
            .submit_guess(self.connection_id, &code, &guess)
            .await
        {
            Ok(feedback) => {
                self.send_message(ServerMessage::GuessAccepted { feedback })
                    .await
            }
            Err(error) => self.send_error(error).await,
        }
    }

    async fn handle_leave_room(&self, code: String) -> Result<(), String> {
        // no direct acknowledgement; the broadcasts carry the outcome
        self.room_service.leave_room(self.connection_id, &code).await;
        Ok(())
    }

    pub async fn send_error(&self, error: RoomError) -> Result<(), String> {
        self.send_message(ServerMessage::Error { error }).await
    }

    async fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.connection_manager
            .send_to_connection(self.connection_id, message)
            .await
    }
}
