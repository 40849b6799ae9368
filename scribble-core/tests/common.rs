use rand::SeedableRng;
use rand::rngs::StdRng;
use scribble_core::{GameSettings, TurnAdvance, advance_turn, begin_drawing, new_game};
use scribble_types::{GameState, PlayerToken, Roster};
use uuid::Uuid;

/// Creates a roster with the given display names, in join order
pub fn create_test_roster(names: &[&str]) -> (Roster, Vec<PlayerToken>) {
    let mut roster = Roster::new();
    let mut tokens = Vec::new();
    for name in names {
        let token = Uuid::new_v4();
        roster.upsert(token, name);
        tokens.push(token);
    }
    (roster, tokens)
}

/// Deterministic RNG so shuffles are reproducible across runs
pub fn test_rng() -> StdRng {
    StdRng::seed_from_u64(0x5c21_bb1e)
}

/// Starts a game and the first turn
pub fn start_game(roster: &Roster, settings: &GameSettings) -> GameState {
    let mut rng = test_rng();
    let mut state = new_game(roster, settings.total_rounds, &mut rng);
    let outcome = advance_turn(&mut state, roster, settings.choose_seconds);
    assert!(matches!(outcome, TurnAdvance::NextTurn { .. }));
    state
}

/// Plays the current turn to its end without anyone guessing
pub fn finish_turn(state: &mut GameState, roster: &Roster, settings: &GameSettings) -> TurnAdvance {
    begin_drawing(state, "pizza", settings.draw_seconds);
    advance_turn(state, roster, settings.choose_seconds)
}
