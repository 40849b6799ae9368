use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Player, PlayerToken};

/// Short room code chosen by the players.
pub type RoomId = String;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Idle,
    Playing,
    Ended,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TurnPhase {
    #[default]
    Choosing,
    Drawing,
}

/// Per-room game record, persisted as `game:{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub phase: TurnPhase,
    /// Drawing rotation, fixed when the game starts.
    pub turn_order: Vec<PlayerToken>,
    /// `None` until the first turn begins.
    pub current_turn_index: Option<usize>,
    pub current_round: u32,
    pub total_rounds: u32,
    /// Empty outside the drawing phase.
    pub current_word: String,
    pub players_who_guessed: Vec<PlayerToken>,
    /// Full duration of the phase that was last started. Informational only;
    /// the room's live countdown is never written back here.
    pub timer: u32,
}

impl GameState {
    pub fn current_drawer(&self) -> Option<PlayerToken> {
        self.current_turn_index
            .and_then(|index| self.turn_order.get(index))
            .copied()
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn is_drawing(&self) -> bool {
        self.is_playing() && self.phase == TurnPhase::Drawing && !self.current_word.is_empty()
    }

    pub fn has_guessed(&self, token: PlayerToken) -> bool {
        self.players_who_guessed.contains(&token)
    }
}

/// Read-only view of a room for HTTP callers. Never carries the secret word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomSnapshot {
    pub room: RoomId,
    pub players: Vec<Player>,
    pub status: GameStatus,
    pub phase: Option<TurnPhase>,
    pub drawer: Option<PlayerToken>,
    pub round: u32,
    pub total_rounds: u32,
    pub word_blanks: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_state() -> GameState {
        GameState {
            status: GameStatus::Playing,
            phase: TurnPhase::Choosing,
            turn_order: vec![Uuid::new_v4(), Uuid::new_v4()],
            current_turn_index: None,
            current_round: 1,
            total_rounds: 3,
            current_word: String::new(),
            players_who_guessed: Vec::new(),
            timer: 0,
        }
    }

    #[test]
    fn test_current_drawer_follows_index() {
        let mut state = sample_state();
        assert_eq!(state.current_drawer(), None);

        state.current_turn_index = Some(1);
        assert_eq!(state.current_drawer(), Some(state.turn_order[1]));

        state.current_turn_index = Some(5);
        assert_eq!(state.current_drawer(), None);
    }

    #[test]
    fn test_is_drawing_requires_word() {
        let mut state = sample_state();
        state.phase = TurnPhase::Drawing;
        assert!(!state.is_drawing());

        state.current_word = "pizza".to_string();
        assert!(state.is_drawing());

        state.status = GameStatus::Ended;
        assert!(!state.is_drawing());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&GameStatus::Playing).unwrap();
        assert_eq!(json, "\"playing\"");
    }
}
