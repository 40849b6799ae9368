use scribble_core::{
    GuessCheck, TurnAdvance, check_guess, everyone_guessed, record_correct_guess, word_blanks,
};
use scribble_types::{ChatLine, GameState, PlayerToken, Roster, ServerMessage, TurnPhase};
use tracing::{debug, error, info, warn};

use super::actor::{RoomActor, RoomResult};
use super::timer::TimerTick;

const ANONYMOUS: &str = "Anonymous";
const UNKNOWN_DRAWER: &str = "Unknown";

/// Masked turn announcement for everyone but the drawer.
pub(super) fn turn_update(game: &GameState, roster: &Roster) -> Option<ServerMessage> {
    let drawer = game.current_drawer()?;
    let drawer_name = roster
        .get(drawer)
        .map(|player| player.name.clone())
        .unwrap_or_else(|| UNKNOWN_DRAWER.to_string());

    Some(ServerMessage::TurnUpdate {
        drawer_name,
        drawer_id: drawer,
        word_blanks: word_blanks(&game.current_word),
        round: game.current_round,
        total_rounds: game.total_rounds,
    })
}

impl RoomActor {
    /// Host-only. Ignored while a game is already running.
    pub async fn start_game(&mut self, token: PlayerToken) -> RoomResult {
        let Some(roster) = self.repository.get_roster(&self.room_id).await? else {
            return Ok(());
        };
        if roster.host() != Some(token) {
            debug!("Room {}: start requested by non-host {}", self.room_id, token);
            return Ok(());
        }
        if let Some(existing) = self.repository.get_game(&self.room_id).await? {
            if existing.is_playing() {
                debug!("Room {}: game already running", self.room_id);
                return Ok(());
            }
        }

        let game = scribble_core::new_game(&roster, self.settings.total_rounds, &mut self.rng);
        self.repository.set_game(&self.room_id, &game).await?;
        info!(
            "Room {}: game started with {} players",
            self.room_id,
            game.turn_order.len()
        );

        self.announce(format!(
            "The game is starting! Round 1 of {}",
            game.total_rounds
        ))
        .await;

        self.advance_turn().await
    }

    /// Close the current turn and open the next one, ending the game or
    /// tearing the room down when appropriate.
    pub async fn advance_turn(&mut self) -> RoomResult {
        let (Some(mut game), Some(roster)) = (
            self.repository.get_game(&self.room_id).await?,
            self.repository.get_roster(&self.room_id).await?,
        ) else {
            return Ok(());
        };

        let outcome = scribble_core::advance_turn(&mut game, &roster, self.settings.choose_seconds);
        match outcome {
            TurnAdvance::RoomEmpty => self.repository.delete_room(&self.room_id).await?,
            _ => self.repository.set_game(&self.room_id, &game).await?,
        }

        // Stop only after the write; otherwise the old countdown stays live
        self.timer.stop();
        self.offered_words.clear();

        match outcome {
            TurnAdvance::RoomEmpty => {
                info!("Room {}: everyone left, room deleted", self.room_id);
            }
            TurnAdvance::GameOver => {
                info!("Room {}: game over", self.room_id);

                self.announce("Game Over!").await;
                self.broadcast(ServerMessage::GameOver).await;
            }
            TurnAdvance::NextTurn { drawer, new_round } => {
                if new_round {
                    self.announce(format!(
                        "Starting Round {} of {}",
                        game.current_round, game.total_rounds
                    ))
                    .await;
                }

                let drawer_name = roster
                    .get(drawer)
                    .map(|player| player.name.as_str())
                    .unwrap_or(UNKNOWN_DRAWER);
                debug!("Room {}: {} is drawing", self.room_id, drawer_name);

                self.broadcast(ServerMessage::ClearCanvas).await;
                self.announce(format!("It's {}'s turn to draw.", drawer_name))
                    .await;
                self.offer_words(drawer).await;
            }
        }

        Ok(())
    }

    async fn offer_words(&mut self, drawer: PlayerToken) {
        let words = self
            .words
            .draw_candidates(&mut self.rng, self.settings.word_choices);
        if words.is_empty() {
            warn!("Room {}: word bank is empty", self.room_id);
        }

        self.offered_words = words.clone();
        self.send_to(drawer, ServerMessage::ChooseWord { words }).await;
        self.start_countdown(TurnPhase::Choosing, self.settings.choose_seconds)
            .await;
    }

    async fn start_countdown(&mut self, phase: TurnPhase, seconds: u32) {
        self.timer.start(phase, seconds);
        self.broadcast(ServerMessage::TimerUpdate { seconds }).await;
    }

    /// Only the drawer may choose, only during the choosing phase and only
    /// one of the offered candidates.
    pub async fn choose_word(&mut self, token: PlayerToken, word: &str) -> RoomResult {
        let Some(game) = self.repository.get_game(&self.room_id).await? else {
            return Ok(());
        };
        if !game.is_playing()
            || game.phase != TurnPhase::Choosing
            || game.current_drawer() != Some(token)
        {
            debug!("Room {}: ignoring word choice from {}", self.room_id, token);
            return Ok(());
        }

        let wanted = word.to_lowercase();
        let Some(chosen) = self
            .offered_words
            .iter()
            .find(|candidate| candidate.to_lowercase() == wanted)
            .cloned()
        else {
            debug!("Room {}: '{}' was not offered", self.room_id, word);
            return Ok(());
        };

        self.start_drawing_phase(game, &chosen).await
    }

    async fn start_drawing_phase(&mut self, mut game: GameState, word: &str) -> RoomResult {
        scribble_core::begin_drawing(&mut game, word, self.settings.draw_seconds);
        self.repository.set_game(&self.room_id, &game).await?;
        self.timer.stop();
        self.offered_words.clear();

        let roster = self
            .repository
            .get_roster(&self.room_id)
            .await?
            .unwrap_or_default();

        self.broadcast(ServerMessage::ClearCanvas).await;
        if let Some(drawer) = game.current_drawer() {
            self.send_to(
                drawer,
                ServerMessage::DrawingPhaseStarted {
                    word: word.to_string(),
                },
            )
            .await;
        }
        if let Some(update) = turn_update(&game, &roster) {
            self.broadcast(update).await;
        }

        self.start_countdown(TurnPhase::Drawing, self.settings.draw_seconds)
            .await;
        Ok(())
    }

    /// Chat line or guess.
    pub async fn send_message(&mut self, token: PlayerToken, text: &str) -> RoomResult {
        let Some(mut roster) = self.repository.get_roster(&self.room_id).await? else {
            return Ok(());
        };
        let game = self.repository.get_game(&self.room_id).await?;

        let name = roster
            .get(token)
            .map(|player| player.name.clone())
            .unwrap_or_else(|| ANONYMOUS.to_string());

        match check_guess(game.as_ref(), token, text) {
            GuessCheck::Chat => {
                self.broadcast(ServerMessage::ReceiveMessage {
                    line: ChatLine::player(name, text),
                })
                .await;
                Ok(())
            }
            GuessCheck::Withheld => {
                debug!("Room {}: withheld answer from {}", self.room_id, name);
                Ok(())
            }
            GuessCheck::Correct => {
                let Some(previous) = game else {
                    return Ok(());
                };
                let mut game = previous.clone();
                let remaining = self.timer.remaining_in(TurnPhase::Drawing).unwrap_or(0);
                let points = record_correct_guess(
                    &mut game,
                    &mut roster,
                    token,
                    remaining,
                    self.settings.draw_seconds,
                );

                self.repository.set_game(&self.room_id, &game).await?;
                if let Err(e) = self.repository.set_roster(&self.room_id, &roster).await {
                    // Roll the guessed-set back so the guess can be retried
                    if let Err(rollback) =
                        self.repository.set_game(&self.room_id, &previous).await
                    {
                        error!(
                            "Room {}: failed to restore game after guess: {}",
                            self.room_id, rollback
                        );
                    }
                    return Err(e.into());
                }
                info!(
                    "Room {}: {} guessed with {}s left (+{})",
                    self.room_id, name, remaining, points
                );

                self.broadcast(ServerMessage::ReceiveMessage {
                    line: ChatLine::correct_guess(format!(
                        "{} guessed the word! (+{})",
                        name, points
                    )),
                })
                .await;
                self.broadcast_player_list(&roster).await;

                if everyone_guessed(&game, &roster) {
                    self.announce("Everyone guessed! Moving to next turn.").await;
                    self.advance_turn().await?;
                }
                Ok(())
            }
        }
    }

    pub async fn on_timer_tick(&mut self, generation: u64) -> RoomResult {
        match self.timer.tick(generation) {
            TimerTick::Stale => Ok(()),
            TimerTick::Running { remaining } => {
                self.broadcast(ServerMessage::TimerUpdate { seconds: remaining })
                    .await;
                Ok(())
            }
            TimerTick::Expired { phase } => {
                self.broadcast(ServerMessage::TimerUpdate { seconds: 0 }).await;
                match phase {
                    TurnPhase::Choosing => self.on_choosing_expired().await,
                    TurnPhase::Drawing => self.on_drawing_expired().await,
                }
            }
        }
    }

    async fn on_choosing_expired(&mut self) -> RoomResult {
        let Some(game) = self.repository.get_game(&self.room_id).await? else {
            return Ok(());
        };
        if !game.is_playing() || game.phase != TurnPhase::Choosing {
            return Ok(());
        }
        let Some(drawer) = game.current_drawer() else {
            return Ok(());
        };

        let Some(word) = self.offered_words.first().cloned() else {
            warn!("Room {}: no word to pick, skipping turn", self.room_id);
            return self.advance_turn().await;
        };

        self.send_to(
            drawer,
            ServerMessage::ReceiveMessage {
                line: ChatLine::system("Time's up! We picked a word for you."),
            },
        )
        .await;

        self.start_drawing_phase(game, &word).await
    }

    async fn on_drawing_expired(&mut self) -> RoomResult {
        let Some(game) = self.repository.get_game(&self.room_id).await? else {
            return Ok(());
        };
        if !game.is_drawing() {
            return Ok(());
        }

        self.announce(format!("Time's up! The word was: {}", game.current_word))
            .await;
        self.advance_turn().await
    }
}
