use rand::Rng;
use rand::seq::SliceRandom;
use scribble_types::{
    GameState, GameStatus, PlayerToken, RoomId, RoomSnapshot, Roster, TurnPhase,
};

use crate::{ScoringEngine, is_correct_guess, word_blanks};

/// Tunables for one game. Defaults match the classic rules.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub total_rounds: u32,
    pub choose_seconds: u32,
    pub draw_seconds: u32,
    pub word_choices: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            total_rounds: 3,
            choose_seconds: 15,
            draw_seconds: 60,
            word_choices: 3,
        }
    }
}

/// What the room must do after a turn boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnAdvance {
    /// Every participant is gone; both room records should be deleted.
    RoomEmpty,
    /// The last round finished. The state is now `Ended`.
    GameOver,
    NextTurn {
        drawer: PlayerToken,
        new_round: bool,
    },
}

/// How a chat line relates to the current drawing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessCheck {
    /// Scores for the sender.
    Correct,
    /// Matches the word but the sender may not score (drawer, repeat guesser
    /// or late joiner). Never relayed.
    Withheld,
    /// Ordinary chat.
    Chat,
}

/// Fresh game over the current roster with a shuffled turn order. The first
/// turn is not started yet; call [`advance_turn`] next.
pub fn new_game<R: Rng + ?Sized>(roster: &Roster, total_rounds: u32, rng: &mut R) -> GameState {
    let mut turn_order = roster.tokens();
    turn_order.shuffle(rng);

    GameState {
        status: GameStatus::Playing,
        phase: TurnPhase::Choosing,
        turn_order,
        current_turn_index: None,
        current_round: 1,
        total_rounds,
        current_word: String::new(),
        players_who_guessed: Vec::new(),
        timer: 0,
    }
}

/// Move to the next drawer.
///
/// Departed players are dropped from the turn order first. The index is
/// shifted so that the rotation continues with whoever followed the previous
/// drawer, even when people before them left.
pub fn advance_turn(state: &mut GameState, roster: &Roster, choose_seconds: u32) -> TurnAdvance {
    let kept_through_current = match state.current_turn_index {
        Some(index) if !state.turn_order.is_empty() => {
            let last = index.min(state.turn_order.len() - 1);
            state.turn_order[..=last]
                .iter()
                .filter(|token| roster.contains(**token))
                .count()
        }
        _ => 0,
    };

    state.turn_order.retain(|token| roster.contains(*token));
    if state.turn_order.is_empty() {
        return TurnAdvance::RoomEmpty;
    }

    let mut next = kept_through_current;
    let mut new_round = false;
    if next >= state.turn_order.len() {
        next = 0;
        new_round = true;
        state.current_round += 1;
    }

    state.current_turn_index = Some(next);
    state.current_word.clear();
    state.players_who_guessed.clear();

    if state.current_round > state.total_rounds {
        state.status = GameStatus::Ended;
        return TurnAdvance::GameOver;
    }

    state.phase = TurnPhase::Choosing;
    state.timer = choose_seconds;

    TurnAdvance::NextTurn {
        drawer: state.turn_order[next],
        new_round,
    }
}

/// Enter the drawing phase with the chosen word.
pub fn begin_drawing(state: &mut GameState, word: &str, draw_seconds: u32) {
    state.current_word = word.to_string();
    state.phase = TurnPhase::Drawing;
    state.timer = draw_seconds;
}

pub fn check_guess(state: Option<&GameState>, sender: PlayerToken, text: &str) -> GuessCheck {
    let Some(state) = state else {
        return GuessCheck::Chat;
    };

    if !state.is_drawing() || !is_correct_guess(text, &state.current_word) {
        return GuessCheck::Chat;
    }

    let eligible = state.turn_order.contains(&sender)
        && state.current_drawer() != Some(sender)
        && !state.has_guessed(sender);

    if eligible {
        GuessCheck::Correct
    } else {
        GuessCheck::Withheld
    }
}

/// Credit a correct guess and return the guesser's award. The drawer gets
/// the flat bonus if still present.
pub fn record_correct_guess(
    state: &mut GameState,
    roster: &mut Roster,
    guesser: PlayerToken,
    remaining_seconds: u32,
    draw_seconds: u32,
) -> u32 {
    let points = ScoringEngine::guess_points(remaining_seconds, draw_seconds);
    roster.credit(guesser, points);

    if let Some(drawer) = state.current_drawer() {
        roster.credit(drawer, ScoringEngine::drawer_points());
    }

    state.players_who_guessed.push(guesser);
    points
}

/// True once every present participant other than the drawer has guessed.
pub fn everyone_guessed(state: &GameState, roster: &Roster) -> bool {
    let drawer = state.current_drawer();

    !state.players_who_guessed.is_empty()
        && state
            .turn_order
            .iter()
            .filter(|token| Some(**token) != drawer && roster.contains(**token))
            .all(|token| state.has_guessed(*token))
}

/// Public view of a room. The word only appears as blanks.
pub fn room_snapshot(room: &str, roster: &Roster, game: Option<&GameState>) -> RoomSnapshot {
    let room: RoomId = room.to_string();
    let players = roster.player_list();

    match game {
        Some(game) => RoomSnapshot {
            room,
            players,
            status: game.status,
            phase: game.is_playing().then_some(game.phase),
            drawer: game.is_playing().then(|| game.current_drawer()).flatten(),
            round: game.current_round.min(game.total_rounds),
            total_rounds: game.total_rounds,
            word_blanks: game.is_drawing().then(|| word_blanks(&game.current_word)),
        },
        None => RoomSnapshot {
            room,
            players,
            status: GameStatus::Idle,
            phase: None,
            drawer: None,
            round: 0,
            total_rounds: 0,
            word_blanks: None,
        },
    }
}
