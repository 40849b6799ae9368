use scribble_types::{PlayerToken, RoomId, ServerMessage};
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

/// One socket session. The id doubles as the player token inside rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn token(&self) -> PlayerToken {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<PlayerToken> for ConnectionId {
    fn from(token: PlayerToken) -> Self {
        Self(token)
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
    pub room_id: Option<RoomId>,
    pub connected_at: Instant,
    pub sender: mpsc::UnboundedSender<ServerMessage>,
}

impl Connection {
    pub fn new(id: ConnectionId) -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let connection = Self {
            id,
            room_id: None,
            connected_at: Instant::now(),
            sender,
        };

        (connection, receiver)
    }

    pub fn in_room(&self, room_id: &str) -> bool {
        self.room_id.as_deref() == Some(room_id)
    }

    pub fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .map_err(|_| "Connection closed".to_string())
    }
}

/// Live sockets and the room each one is attached to. Room actors deliver
/// all outbound traffic through here.
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

        {
            let mut connections = self.connections.write().await;
            connections.insert(id, conn);
        }

        receiver
    }

    /// Drop the connection and return the room it was attached to.
    pub async fn remove_connection(&self, id: ConnectionId) -> Option<RoomId> {
        let removed = {
            let mut connections = self.connections.write().await;
            connections.remove(&id)
        };

        removed.and_then(|conn| {
            tracing::debug!(
                "Connection {} closed after {:?}",
                id,
                conn.connected_at.elapsed()
            );
            conn.room_id
        })
    }

    pub async fn get_connection(&self, id: ConnectionId) -> Option<Connection> {
        let connections = self.connections.read().await;
        connections.get(&id).cloned()
    }

    pub async fn send_to_connection(
        &self,
        id: ConnectionId,
        message: ServerMessage,
    ) -> Result<(), String> {
        let connections = self.connections.read().await;
        if let Some(connection) = connections.get(&id) {
            connection.send_message(message)
        } else {
            Err("Connection not found".to_string())
        }
    }

    pub async fn send_to_room(&self, room_id: &str, message: ServerMessage) {
        let connections = self.connections.read().await;
        for connection in connections.values().filter(|conn| conn.in_room(room_id)) {
            let _ = connection.send_message(message.clone());
        }
    }

    pub async fn send_to_room_except(
        &self,
        room_id: &str,
        except_connection: ConnectionId,
        message: ServerMessage,
    ) {
        let connections = self.connections.read().await;
        for connection in connections.values() {
            if connection.id != except_connection && connection.in_room(room_id) {
                let _ = connection.send_message(message.clone());
            }
        }
    }

    /// Attach the connection to a room and return the previous one.
    pub async fn set_connection_room(
        &self,
        id: ConnectionId,
        room_id: Option<RoomId>,
    ) -> Option<RoomId> {
        let mut connections = self.connections.write().await;
        connections
            .get_mut(&id)
            .and_then(|connection| std::mem::replace(&mut connection.room_id, room_id))
    }

    pub async fn room_has_connections(&self, room_id: &str) -> bool {
        let connections = self.connections.read().await;
        connections.values().any(|conn| conn.in_room(room_id))
    }

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
