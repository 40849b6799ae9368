mod actor;
mod session;
mod timer;
mod turns;

pub use actor::{RoomActor, RoomCommand, RoomError};
pub use session::JoinOutcome;
pub use timer::{PhaseTimer, TimerTick};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use scribble_core::{GameSettings, WordBank};
use scribble_store::RoomRepository;
use scribble_types::RoomId;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::websocket::connection::ConnectionManager;

/// Sending half of a room actor's queue.
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::UnboundedSender<RoomCommand>,
}

impl RoomHandle {
    pub fn send(&self, command: RoomCommand) -> Result<(), RoomCommand> {
        self.sender.send(command).map_err(|e| e.0)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Live room actors keyed by room code. Rooms are spawned on first use and
/// retired by [`RoomRegistry::sweep_idle_rooms`] once no socket is attached.
pub struct RoomRegistry {
    rooms: DashMap<RoomId, RoomHandle>,
    repository: RoomRepository,
    connections: Arc<ConnectionManager>,
    words: Arc<WordBank>,
    settings: GameSettings,
}

impl RoomRegistry {
    pub fn new(
        repository: RoomRepository,
        connections: Arc<ConnectionManager>,
        words: Arc<WordBank>,
        settings: GameSettings,
    ) -> Self {
        Self {
            rooms: DashMap::new(),
            repository,
            connections,
            words,
            settings,
        }
    }

    pub fn repository(&self) -> &RoomRepository {
        &self.repository
    }

    /// Queue a command for the room, spawning its actor if needed.
    pub fn dispatch(&self, room_id: &str, command: RoomCommand) {
        let handle = self.get_or_spawn(room_id);
        if let Err(command) = handle.send(command) {
            // The actor exited between lookup and send; start a fresh one.
            warn!("Room {} actor was gone, respawning", room_id);
            self.rooms.remove(room_id);
            if self.get_or_spawn(room_id).send(command).is_err() {
                warn!("Dropped command for room {}", room_id);
            }
        }
    }

    fn get_or_spawn(&self, room_id: &str) -> RoomHandle {
        match self.rooms.entry(room_id.to_string()) {
            Entry::Occupied(entry) if !entry.get().is_closed() => entry.get().clone(),
            Entry::Occupied(mut entry) => {
                let handle = self.spawn_room(room_id);
                entry.insert(handle.clone());
                handle
            }
            Entry::Vacant(entry) => entry.insert(self.spawn_room(room_id)).clone(),
        }
    }

    fn spawn_room(&self, room_id: &str) -> RoomHandle {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actor = RoomActor::new(
            room_id.to_string(),
            self.repository.clone(),
            self.connections.clone(),
            self.words.clone(),
            self.settings.clone(),
            sender.downgrade(),
        );

        tokio::spawn(actor.run(receiver));
        info!("Spawned room {}", room_id);

        RoomHandle { sender }
    }

    /// Drop handles for rooms with no attached sockets. The actor drains its
    /// queue and stops once the last handle is gone.
    pub async fn sweep_idle_rooms(&self) -> usize {
        let room_ids: Vec<RoomId> = self.rooms.iter().map(|entry| entry.key().clone()).collect();

        let mut removed = 0;
        for room_id in room_ids {
            if self.connections.room_has_connections(&room_id).await {
                continue;
            }
            if self.rooms.remove(&room_id).is_some() {
                info!("Retired idle room {}", room_id);
                removed += 1;
            }
        }

        removed
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn has_room(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websocket::connection::ConnectionId;
    use scribble_store::MemoryStore;
    use scribble_types::ServerMessage;
    use std::time::Duration;

    fn registry() -> (RoomRegistry, Arc<ConnectionManager>) {
        let connections = Arc::new(ConnectionManager::new());
        let repository = RoomRepository::new(Arc::new(MemoryStore::new()));
        let registry = RoomRegistry::new(
            repository,
            connections.clone(),
            Arc::new(WordBank::default_words()),
            GameSettings::default(),
        );
        (registry, connections)
    }

    #[tokio::test]
    async fn test_dispatch_spawns_room_once() {
        let (registry, connections) = registry();
        let conn_id = ConnectionId::new();
        let mut receiver = connections.create_connection(conn_id).await;
        connections
            .set_connection_room(conn_id, Some("ABCDE".to_string()))
            .await;

        registry.dispatch(
            "ABCDE",
            RoomCommand::Join {
                token: conn_id.token(),
                name: "Alice".to_string(),
            },
        );
        registry.dispatch(
            "ABCDE",
            RoomCommand::Join {
                token: conn_id.token(),
                name: "Alice".to_string(),
            },
        );
        assert_eq!(registry.room_count(), 1);

        let first = tokio::time::timeout(Duration::from_secs(1), receiver.recv())
            .await
            .unwrap();
        assert_eq!(first, Some(ServerMessage::AmIHost { is_host: true }));
    }

    #[tokio::test]
    async fn test_sweep_keeps_rooms_with_sockets() {
        let (registry, connections) = registry();
        let conn_id = ConnectionId::new();
        let _receiver = connections.create_connection(conn_id).await;
        connections
            .set_connection_room(conn_id, Some("BUSY".to_string()))
            .await;

        registry.dispatch(
            "BUSY",
            RoomCommand::Leave {
                token: conn_id.token(),
            },
        );
        registry.dispatch(
            "EMPTY",
            RoomCommand::Leave {
                token: conn_id.token(),
            },
        );

        assert_eq!(registry.sweep_idle_rooms().await, 1);
        assert!(registry.has_room("BUSY"));
        assert!(!registry.has_room("EMPTY"));
    }
}
