mod common;

use common::*;
use scribble_core::{
    GameSettings, GuessCheck, TurnAdvance, advance_turn, begin_drawing, check_guess,
    everyone_guessed, record_correct_guess,
};
use scribble_types::{GameStatus, TurnPhase};

#[test]
fn test_round_increments_after_everyone_draws() {
    let settings = GameSettings::default();
    let (roster, _) = create_test_roster(&["Alice", "Bob"]);
    let mut state = start_game(&roster, &settings);
    assert_eq!(state.current_round, 1);

    let second = finish_turn(&mut state, &roster, &settings);
    assert!(matches!(second, TurnAdvance::NextTurn { new_round: false, .. }));
    assert_eq!(state.current_round, 1);
    assert_eq!(state.current_turn_index, Some(1));

    let third = finish_turn(&mut state, &roster, &settings);
    assert!(matches!(third, TurnAdvance::NextTurn { new_round: true, .. }));
    assert_eq!(state.current_round, 2);
    assert_eq!(state.current_turn_index, Some(0));
}

#[test]
fn test_game_ends_after_total_rounds() {
    let settings = GameSettings::default();
    let (roster, _) = create_test_roster(&["Alice", "Bob"]);
    let mut state = start_game(&roster, &settings);

    // 3 rounds of 2 turns; the first turn is already running
    let mut turns_started = 1;
    loop {
        match finish_turn(&mut state, &roster, &settings) {
            TurnAdvance::NextTurn { .. } => turns_started += 1,
            TurnAdvance::GameOver => break,
            TurnAdvance::RoomEmpty => panic!("Room should not empty out"),
        }
        assert!(state.current_round <= settings.total_rounds);
    }

    assert_eq!(turns_started, 6);
    assert_eq!(state.status, GameStatus::Ended);
    assert!(state.current_word.is_empty());

    // Once ended, no further turn starts
    assert_eq!(
        check_guess(Some(&state), state.turn_order[0], "pizza"),
        GuessCheck::Chat
    );
}

#[test]
fn test_every_participant_draws_once_per_round() {
    let settings = GameSettings::default();
    let (roster, tokens) = create_test_roster(&["Alice", "Bob", "Carol", "Dave"]);
    let mut state = start_game(&roster, &settings);

    let mut drawers = vec![state.current_drawer().unwrap()];
    for _ in 1..tokens.len() {
        finish_turn(&mut state, &roster, &settings);
        drawers.push(state.current_drawer().unwrap());
    }

    drawers.sort();
    let mut expected = tokens.clone();
    expected.sort();
    assert_eq!(drawers, expected);
}

#[test]
fn test_full_turn_with_all_guessers() {
    let settings = GameSettings::default();
    let (mut roster, _) = create_test_roster(&["Alice", "Bob", "Carol"]);
    let mut state = start_game(&roster, &settings);
    begin_drawing(&mut state, "guitar", settings.draw_seconds);
    assert_eq!(state.phase, TurnPhase::Drawing);

    let drawer = state.current_drawer().unwrap();
    let guessers: Vec<_> = state
        .turn_order
        .iter()
        .copied()
        .filter(|t| *t != drawer)
        .collect();

    for (i, guesser) in guessers.iter().enumerate() {
        assert_eq!(check_guess(Some(&state), *guesser, "Guitar"), GuessCheck::Correct);
        let points =
            record_correct_guess(&mut state, &mut roster, *guesser, 60 - i as u32 * 10, 60);
        assert!((100..=500).contains(&points));
    }

    assert!(everyone_guessed(&state, &roster));
    assert_eq!(roster.get(drawer).unwrap().score, 100);

    // Leaderboard order puts the fastest guesser first
    let leader = roster.player_list()[0].id;
    assert_eq!(leader, guessers[0]);

    let outcome = advance_turn(&mut state, &roster, settings.choose_seconds);
    assert!(matches!(outcome, TurnAdvance::NextTurn { .. }));
    assert!(state.players_who_guessed.is_empty());
}

#[test]
fn test_departures_keep_indices_consistent() {
    let settings = GameSettings::default();
    let (mut roster, _) = create_test_roster(&["Alice", "Bob", "Carol", "Dave"]);
    let mut state = start_game(&roster, &settings);

    // Second turn, then the first two in the order leave
    finish_turn(&mut state, &roster, &settings);
    let order = state.turn_order.clone();
    roster.remove(order[0]);
    roster.remove(order[1]);

    let outcome = finish_turn(&mut state, &roster, &settings);
    assert_eq!(
        outcome,
        TurnAdvance::NextTurn {
            drawer: order[2],
            new_round: false
        }
    );
    assert_eq!(state.turn_order, vec![order[2], order[3]]);
    assert_eq!(state.current_turn_index, Some(0));

    let outcome = finish_turn(&mut state, &roster, &settings);
    assert_eq!(
        outcome,
        TurnAdvance::NextTurn {
            drawer: order[3],
            new_round: false
        }
    );
    let index = state.current_turn_index.unwrap();
    assert!(index < state.turn_order.len());
}
