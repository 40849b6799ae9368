use scribble_types::{Player, PlayerToken, ServerMessage};
use tracing::{debug, info};

use super::actor::{RoomActor, RoomResult};
use super::turns::turn_update;

#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub is_host: bool,
    pub players: Vec<Player>,
}

impl RoomActor {
    /// Add or rename a player. The first player in the roster is the host.
    pub async fn join(&mut self, token: PlayerToken, name: &str) -> RoomResult<JoinOutcome> {
        let mut roster = self
            .repository
            .get_roster(&self.room_id)
            .await?
            .unwrap_or_default();

        let is_new = roster.upsert(token, name);
        self.repository.set_roster(&self.room_id, &roster).await?;

        let is_host = roster.host() == Some(token);
        if is_new {
            info!("{} joined room {} (host: {})", name, self.room_id, is_host);
        } else {
            debug!("{} rejoined room {}", name, self.room_id);
        }

        self.send_to(token, ServerMessage::AmIHost { is_host }).await;
        self.broadcast_player_list(&roster).await;
        self.announce(format!("{} has joined!", name)).await;

        // Late joiners see the current turn but never the word
        if let Some(game) = self.repository.get_game(&self.room_id).await? {
            if game.is_drawing() {
                if let Some(update) = turn_update(&game, &roster) {
                    self.send_to(token, update).await;
                }
            }
        }

        Ok(JoinOutcome {
            is_host,
            players: roster.player_list(),
        })
    }

    /// Remove a player. The game record is left alone; departed players are
    /// filtered out of the turn order at the next turn boundary.
    pub async fn leave(&mut self, token: PlayerToken) -> RoomResult {
        let Some(mut roster) = self.repository.get_roster(&self.room_id).await? else {
            return Ok(());
        };
        let Some(player) = roster.remove(token) else {
            return Ok(());
        };

        self.repository.set_roster(&self.room_id, &roster).await?;
        info!("{} left room {}", player.name, self.room_id);

        self.broadcast_player_list(&roster).await;
        self.announce(format!("{} has left.", player.name)).await;
        Ok(())
    }
}
