use std::sync::Arc;
use tracing::{debug, info};

use crate::rooms::{RoomCommand, RoomRegistry};
use crate::websocket::connection::{ConnectionId, ConnectionManager};
use scribble_types::{ClientMessage, DrawData, RoomId, ServerMessage};

/// Routes one connection's client messages to its room actor.
#[derive(Clone)]
pub struct MessageHandler {
    connection_id: ConnectionId,
    connection_manager: Arc<ConnectionManager>,
    rooms: Arc<RoomRegistry>,
}

impl MessageHandler {
    pub fn new(
        connection_id: ConnectionId,
        connection_manager: Arc<ConnectionManager>,
        rooms: Arc<RoomRegistry>,
    ) -> Self {
        Self {
            connection_id,
            connection_manager,
            rooms,
        }
    }

    pub async fn handle_message(&self, message: ClientMessage) -> Result<(), String> {
        match message {
            ClientMessage::JoinGame { room, name } => self.handle_join_game(room, name).await,
            ClientMessage::StartGame => {
                self.dispatch_to_room(|token| RoomCommand::StartGame { token })
                    .await
            }
            ClientMessage::WordChosen { word } => {
                self.dispatch_to_room(|token| RoomCommand::ChooseWord { token, word })
                    .await
            }
            ClientMessage::SendMessage { message } => {
                self.dispatch_to_room(|token| RoomCommand::SendMessage {
                    token,
                    text: message,
                })
                .await
            }
            ClientMessage::Draw { data } => self.handle_draw(data).await,
            ClientMessage::Heartbeat => Ok(()),
        }
    }

    pub async fn handle_disconnect(&self) {
        info!("Handling disconnect for connection {}", self.connection_id);

        if let Some(room_id) = self.current_room().await {
            self.rooms.dispatch(
                &room_id,
                RoomCommand::Leave {
                    token: self.connection_id.token(),
                },
            );
        }
    }

    async fn handle_join_game(&self, room: RoomId, name: String) -> Result<(), String> {
        let room = room.trim().to_string();
        if room.is_empty() {
            return self.send_error("Room code is required").await;
        }

        info!(
            "Connection {} joining room {} as {}",
            self.connection_id, room, name
        );

        let token = self.connection_id.token();
        let previous = self
            .connection_manager
            .set_connection_room(self.connection_id, Some(room.clone()))
            .await;

        if let Some(previous) = previous.filter(|previous| *previous != room) {
            self.rooms.dispatch(&previous, RoomCommand::Leave { token });
        }

        self.rooms.dispatch(&room, RoomCommand::Join { token, name });
        Ok(())
    }

    async fn handle_draw(&self, data: DrawData) -> Result<(), String> {
        self.dispatch_to_room(|token| RoomCommand::Draw { token, data })
            .await
    }

    /// Commands from a connection that never joined a room are dropped.
    async fn dispatch_to_room<F>(&self, command: F) -> Result<(), String>
    where
        F: FnOnce(scribble_types::PlayerToken) -> RoomCommand,
    {
        match self.current_room().await {
            Some(room_id) => {
                self.rooms
                    .dispatch(&room_id, command(self.connection_id.token()));
            }
            None => debug!("Connection {} is not in a room", self.connection_id),
        }
        Ok(())
    }

    async fn current_room(&self) -> Option<RoomId> {
        self.connection_manager
            .get_connection(self.connection_id)
            .await
            .and_then(|connection| connection.room_id)
    }

    pub async fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.connection_manager
            .send_to_connection(self.connection_id, message)
            .await
    }

    pub async fn send_error(&self, error: &str) -> Result<(), String> {
        self.send_message(ServerMessage::Error {
            message: error.to_string(),
        })
        .await
    }
}
