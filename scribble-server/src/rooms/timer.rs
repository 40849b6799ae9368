use scribble_types::TurnPhase;
use std::time::Duration;
use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::JoinHandle;

use super::RoomCommand;

const TICK: Duration = Duration::from_secs(1);

/// Result of feeding one tick back into the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Tick from a countdown that was stopped or replaced.
    Stale,
    Running { remaining: u32 },
    /// Delivered at most once per countdown. The timer is idle afterwards.
    Expired { phase: TurnPhase },
}

struct Countdown {
    generation: u64,
    phase: TurnPhase,
    remaining: u32,
    ticker: JoinHandle<()>,
}

/// One-second countdown for the current phase of a room.
///
/// The ticker task only posts `RoomCommand::TimerTick` into the room's own
/// queue; the remaining time is decremented by the actor when it handles the
/// tick, so every tick is serialized with player commands. Each countdown
/// carries a generation number and ticks from older generations are ignored.
pub struct PhaseTimer {
    commands: WeakUnboundedSender<RoomCommand>,
    active: Option<Countdown>,
    last_generation: u64,
}

impl PhaseTimer {
    pub fn new(commands: WeakUnboundedSender<RoomCommand>) -> Self {
        Self {
            commands,
            active: None,
            last_generation: 0,
        }
    }

    /// Start a countdown, replacing any countdown already running.
    pub fn start(&mut self, phase: TurnPhase, seconds: u32) -> u64 {
        self.stop();

        self.last_generation += 1;
        let generation = self.last_generation;
        let ticker = spawn_ticker(self.commands.clone(), generation);

        self.active = Some(Countdown {
            generation,
            phase,
            remaining: seconds,
            ticker,
        });

        generation
    }

    pub fn stop(&mut self) {
        if let Some(countdown) = self.active.take() {
            countdown.ticker.abort();
        }
    }

    pub fn tick(&mut self, generation: u64) -> TimerTick {
        let Some(countdown) = self.active.as_mut() else {
            return TimerTick::Stale;
        };
        if countdown.generation != generation {
            return TimerTick::Stale;
        }

        countdown.remaining = countdown.remaining.saturating_sub(1);
        if countdown.remaining > 0 {
            return TimerTick::Running {
                remaining: countdown.remaining,
            };
        }

        let phase = countdown.phase;
        self.stop();
        TimerTick::Expired { phase }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn generation(&self) -> Option<u64> {
        self.active.as_ref().map(|countdown| countdown.generation)
    }

    /// Seconds left in `phase`, or `None` if that phase is not counting down.
    pub fn remaining_in(&self, phase: TurnPhase) -> Option<u32> {
        self.active
            .as_ref()
            .filter(|countdown| countdown.phase == phase)
            .map(|countdown| countdown.remaining)
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_ticker(commands: WeakUnboundedSender<RoomCommand>, generation: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK);
        // The first tick of an interval completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;

            let Some(sender) = commands.upgrade() else {
                break;
            };
            if sender.send(RoomCommand::TimerTick { generation }).is_err() {
                break;
            }
        }
    })
}
