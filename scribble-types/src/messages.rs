use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Player, PlayerToken, RoomId};

/// Name shown on engine-generated chat lines.
pub const SYSTEM_USER: &str = "System";

/// Chat style tag for a correct guess announcement.
pub const CORRECT_GUESS_CLASS: &str = "correct-guess";

/// One pen sample. Relayed to the other players untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DrawData {
    pub x: f64,
    pub y: f64,
    pub is_drawing: bool,
    pub color: String,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatLine {
    pub user: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl ChatLine {
    pub fn system(message: impl Into<String>) -> Self {
        Self {
            user: SYSTEM_USER.to_string(),
            message: message.into(),
            class_name: None,
        }
    }

    pub fn player(user: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            message: message.into(),
            class_name: None,
        }
    }

    pub fn correct_guess(message: impl Into<String>) -> Self {
        Self {
            class_name: Some(CORRECT_GUESS_CLASS.to_string()),
            ..Self::system(message)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    JoinGame { room: RoomId, name: String },
    StartGame,
    WordChosen { word: String },
    SendMessage { message: String },
    Draw { data: DrawData },
    Heartbeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    AmIHost { is_host: bool },
    UpdatePlayerList { players: Vec<Player> },
    /// Sent to the drawer only.
    ChooseWord { words: Vec<String> },
    /// Sent to the drawer only; everyone else gets the blanks in `TurnUpdate`.
    DrawingPhaseStarted { word: String },
    TurnUpdate {
        drawer_name: String,
        drawer_id: PlayerToken,
        word_blanks: String,
        round: u32,
        total_rounds: u32,
    },
    TimerUpdate { seconds: u32 },
    ClearCanvas,
    GameOver,
    ReceiveMessage { line: ChatLine },
    Drawing { data: DrawData },
    Error { message: String },
}
