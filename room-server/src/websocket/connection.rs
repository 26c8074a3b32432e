use room_types::ServerMessage;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Instant;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

/// Opaque handle for one WebSocket connection. Doubles as the member id
/// inside rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    /// Codes of every room this connection belongs to; one connection may
    /// sit in several rooms at once.
    pub rooms: HashSet<String>,
    pub connected_at: Instant,
    pub sender: mpsc::UnboundedSender<ServerMessage>,
}

impl Connection {
    fn new(id: ConnectionId) -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let connection = Self {
            id,
            rooms: HashSet::new(),
            connected_at: Instant::now(),
            sender,
        };

        (connection, receiver)
    }

    pub fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .map_err(|_| "Connection closed".to_string())
    }
}

/// Live connections and their room assignments. Outbound delivery goes
/// through each connection's unbounded channel, so sending never blocks a
/// room mutation on a slow peer.
pub struct ConnectionManager {
    connections: RwLock<HashMap<ConnectionId, Connection>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_connection(
        &self,
        id: ConnectionId,
    ) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (conn, receiver) = Connection::new(id);

        let mut connections = self.connections.write().await;
        connections.insert(id, conn);

        receiver
    }

    pub async fn remove_connection(&self, id: ConnectionId) {
        let mut connections = self.connections.write().await;
        connections.remove(&id);
    }

    pub async fn get_connection(&self, id: ConnectionId) -> Option<Connection> {
        let connections = self.connections.read().await;
        connections.get(&id).cloned()
    }

    /// Subscribe the connection to a room's broadcasts.
    pub async fn join_room(&self, id: ConnectionId, room_code: &str) {
        let mut connections = self.connections.write().await;
        if let Some(connection) = connections.get_mut(&id) {
            connection.rooms.insert(room_code.to_string());
        }
    }

    pub async fn leave_room(&self, id: ConnectionId, room_code: &str) {
        let mut connections = self.connections.write().await;
        if let Some(connection) = connections.get_mut(&id) {
            connection.rooms.remove(room_code);
        }
    }

    pub async fn send_to_connection(
        &self,
        id: ConnectionId,
        message: ServerMessage,
    ) -> Result<(), String> {
        let connections = self.connections.read().await;
        match connections.get(&id) {
            Some(connection) => connection.send_message(message),
            None => Err("Connection not found".to_string()),
        }
    }

    /// Fire-and-forget broadcast to every member of a room. A peer whose
    /// channel has closed is skipped; the disconnect path cleans it up.
    pub async fn send_to_room(&self, room_code: &str, message: ServerMessage) {
        let connections = self.connections.read().await;
        for connection in connections.values() {
            if connection.rooms.contains(room_code) {
                let _ = connection.send_message(message.clone());
            }
        }
    }

    // Test helper
    pub async fn connection_count(&self) -> usize {
        let connections = self.connections.read().await;
        connections.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
