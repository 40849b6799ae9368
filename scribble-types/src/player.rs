use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Opaque identity of one connection. A reconnect gets a fresh token.
pub type PlayerToken = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerToken,
    pub name: String,
    pub score: u32,
}

impl Player {
    pub fn new(id: PlayerToken, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
        }
    }
}

/// Players of one room in join order. Persisted as the `room:{id}` record.
///
/// The first entry is the host. Entries are only removed when their
/// connection leaves, so join order of the survivors is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, token: PlayerToken) -> Option<&Player> {
        self.players.iter().find(|p| p.id == token)
    }

    pub fn contains(&self, token: PlayerToken) -> bool {
        self.get(token).is_some()
    }

    /// Inserts a new player with score 0, or renames an existing entry in
    /// place. Returns true when the token was not present before.
    pub fn upsert(&mut self, token: PlayerToken, name: &str) -> bool {
        match self.players.iter_mut().find(|p| p.id == token) {
            Some(existing) => {
                existing.name = name.to_string();
                false
            }
            None => {
                self.players.push(Player::new(token, name));
                true
            }
        }
    }

    pub fn remove(&mut self, token: PlayerToken) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == token)?;
        Some(self.players.remove(index))
    }

    /// Earliest-joined player still in the roster.
    pub fn host(&self) -> Option<PlayerToken> {
        self.players.first().map(|p| p.id)
    }

    pub fn tokens(&self) -> Vec<PlayerToken> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// Adds points to a player. Returns false if the token is not present.
    pub fn credit(&mut self, token: PlayerToken, points: u32) -> bool {
        match self.players.iter_mut().find(|p| p.id == token) {
            Some(player) => {
                player.score = player.score.saturating_add(points);
                true
            }
            None => false,
        }
    }

    /// Players sorted by score, highest first. Ties keep join order.
    pub fn player_list(&self) -> Vec<Player> {
        let mut players = self.players.clone();
        players.sort_by(|a, b| b.score.cmp(&a.score));
        players
    }
}
