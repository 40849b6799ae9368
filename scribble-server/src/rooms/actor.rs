use rand::SeedableRng;
use rand::rngs::StdRng;
use scribble_core::{GameSettings, WordBank};
use scribble_store::{RoomRepository, StoreError};
use scribble_types::{ChatLine, DrawData, PlayerToken, RoomId, Roster, ServerMessage};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::timer::PhaseTimer;
use crate::websocket::connection::{ConnectionId, ConnectionManager};

/// Everything a room reacts to. Player commands and timer ticks share one
/// queue so they are applied strictly one at a time.
#[derive(Debug, Clone)]
pub enum RoomCommand {
    Join { token: PlayerToken, name: String },
    Leave { token: PlayerToken },
    StartGame { token: PlayerToken },
    ChooseWord { token: PlayerToken, word: String },
    SendMessage { token: PlayerToken, text: String },
    Draw { token: PlayerToken, data: DrawData },
    TimerTick { generation: u64 },
}

#[derive(Error, Debug)]
pub enum RoomError {
    #[error("State store error: {0}")]
    Store(#[from] StoreError),
}

pub type RoomResult<T = ()> = Result<T, RoomError>;

/// Owner of one room. All reads and writes of the room's records happen on
/// this actor's task.
pub struct RoomActor {
    pub(super) room_id: RoomId,
    pub(super) repository: RoomRepository,
    pub(super) connections: Arc<ConnectionManager>,
    pub(super) words: Arc<WordBank>,
    pub(super) settings: GameSettings,
    pub(super) rng: StdRng,
    pub(super) timer: PhaseTimer,
    /// Candidates offered to the current drawer.
    pub(super) offered_words: Vec<String>,
}

impl RoomActor {
    pub fn new(
        room_id: RoomId,
        repository: RoomRepository,
        connections: Arc<ConnectionManager>,
        words: Arc<WordBank>,
        settings: GameSettings,
        commands: mpsc::WeakUnboundedSender<RoomCommand>,
    ) -> Self {
        Self {
            room_id,
            repository,
            connections,
            words,
            settings,
            rng: StdRng::from_entropy(),
            timer: PhaseTimer::new(commands),
            offered_words: Vec::new(),
        }
    }

    /// Replace the random source, for reproducible turn orders.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn timer(&self) -> &PhaseTimer {
        &self.timer
    }

    pub fn offered_words(&self) -> &[String] {
        &self.offered_words
    }

    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<RoomCommand>) {
        info!("Room {} started", self.room_id);

        while let Some(command) = commands.recv().await {
            if let Err(e) = self.handle(command).await {
                error!("Room {} command failed: {}", self.room_id, e);
            }
        }

        self.timer.stop();
        if let Err(e) = self.release().await {
            error!("Room {} cleanup failed: {}", self.room_id, e);
        }
        info!("Room {} stopped", self.room_id);
    }

    /// Apply one command. A store failure aborts the command before anything
    /// is broadcast and leaves the actor usable.
    pub async fn handle(&mut self, command: RoomCommand) -> RoomResult {
        match command {
            RoomCommand::Join { token, name } => self.join(token, &name).await.map(|_| ()),
            RoomCommand::Leave { token } => self.leave(token).await,
            RoomCommand::StartGame { token } => self.start_game(token).await,
            RoomCommand::ChooseWord { token, word } => self.choose_word(token, &word).await,
            RoomCommand::SendMessage { token, text } => self.send_message(token, &text).await,
            RoomCommand::Draw { token, data } => {
                self.relay_stroke(token, data).await;
                Ok(())
            }
            RoomCommand::TimerTick { generation } => self.on_timer_tick(generation).await,
        }
    }

    /// Delete the records of a room nobody is left in.
    async fn release(&self) -> RoomResult {
        let roster = self.repository.get_roster(&self.room_id).await?;
        if roster.is_none_or(|roster| roster.is_empty()) {
            self.repository.delete_room(&self.room_id).await?;
            debug!("Room {} records deleted", self.room_id);
        }
        Ok(())
    }

    async fn relay_stroke(&self, token: PlayerToken, data: DrawData) {
        self.connections
            .send_to_room_except(
                &self.room_id,
                ConnectionId::from(token),
                ServerMessage::Drawing { data },
            )
            .await;
    }

    pub(super) async fn broadcast(&self, message: ServerMessage) {
        self.connections.send_to_room(&self.room_id, message).await;
    }

    pub(super) async fn send_to(&self, token: PlayerToken, message: ServerMessage) {
        if let Err(e) = self
            .connections
            .send_to_connection(ConnectionId::from(token), message)
            .await
        {
            debug!("Room {}: not delivered to {}: {}", self.room_id, token, e);
        }
    }

    pub(super) async fn announce(&self, text: impl Into<String>) {
        self.broadcast(ServerMessage::ReceiveMessage {
            line: ChatLine::system(text),
        })
        .await;
    }

    pub(super) async fn broadcast_player_list(&self, roster: &Roster) {
        self.broadcast(ServerMessage::UpdatePlayerList {
            players: roster.player_list(),
        })
        .await;
    }
}
