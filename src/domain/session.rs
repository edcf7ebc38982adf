use super::phase::Phase;
use super::ports::LayoutGenerator;
use super::round::{MSG_TIME_UP, Round, RoundId, Selection, TickOutcome};
use super::snapshot::GameSnapshot;
use crate::error::{GameError, Result};

pub const GUIDELINES: [&str; 4] = [
    "Tap two tiles to select them.",
    "Match the colors to score points.",
    "The round ends when all pairs are matched or the clock runs out.",
    "Try to beat your high score!",
];

/// Game state spanning rounds: the navigation phase, the high score and the
/// round currently on the board.
///
/// Purely synchronous. Timers and notifications live in the application layer.
#[derive(Debug, Clone)]
pub struct GameSession {
    phase: Phase,
    high_score: u8,
    round: Round,
    round_seconds: u32,
    last_round_id: u64,
}

impl GameSession {
    pub fn new(layouts: &mut dyn LayoutGenerator, round_seconds: u32) -> Self {
        let first = RoundId(1);
        Self {
            phase: Phase::Start,
            high_score: 0,
            round: Round::new(first, layouts.next_layout(), round_seconds),
            round_seconds,
            last_round_id: first.0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn high_score(&self) -> u8 {
        self.high_score
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Replaces the round with a fresh one. Phase and high score are kept.
    pub fn begin_round(&mut self, layouts: &mut dyn LayoutGenerator) -> RoundId {
        self.last_round_id += 1;
        let id = RoundId(self.last_round_id);
        self.round = Round::new(id, layouts.next_layout(), self.round_seconds);
        id
    }

    /// Moves to `to`. Entering `Playing` always deals a fresh round.
    pub fn navigate(&mut self, to: Phase, layouts: &mut dyn LayoutGenerator) -> Result<Phase> {
        let from = self.phase;
        if !from.can_navigate_to(to) {
            return Err(GameError::InvalidTransition { from, to });
        }
        if to == Phase::Playing {
            self.begin_round(layouts);
        }
        self.phase = to;
        Ok(from)
    }

    pub fn select_tile(&mut self, index: usize) -> Result<Selection> {
        self.require_playing()?;
        let outcome = self.round.select_tile(index)?;
        if let Selection::Matched {
            completed: true, ..
        } = outcome
        {
            self.high_score = self.high_score.max(self.round.score());
        }
        Ok(outcome)
    }

    /// One clock pulse. On expiry the board is redealt in place and the phase
    /// stays `Playing`.
    pub fn tick(&mut self, layouts: &mut dyn LayoutGenerator) -> Result<TickOutcome> {
        self.require_playing()?;
        let outcome = self.round.tick()?;
        if outcome == TickOutcome::Expired {
            self.begin_round(layouts);
            self.round.set_message(MSG_TIME_UP);
        }
        Ok(outcome)
    }

    /// Deferred follow-up of a completed round: redeal and return to `Start`.
    ///
    /// Returns `false` without touching anything when `expected` is no longer
    /// the finished round on the board in `Playing`.
    pub fn conclude_round(&mut self, expected: RoundId, layouts: &mut dyn LayoutGenerator) -> bool {
        if self.phase != Phase::Playing
            || self.round.id() != expected
            || !self.round.is_finished()
        {
            return false;
        }
        self.begin_round(layouts);
        self.phase = Phase::Start;
        true
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let round = &self.round;
        GameSnapshot {
            round_id: round.id(),
            phase: self.phase,
            tile_colors: round.tile_colors().to_vec(),
            selected: round.selected().iter().copied().collect(),
            matched: round.matched().iter().copied().collect(),
            score: round.score(),
            high_score: self.high_score,
            time_remaining_seconds: round.time_remaining(),
            message: round.message().to_string(),
            finished: round.is_finished(),
            guidelines: match self.phase {
                Phase::Guidelines => GUIDELINES.iter().map(|line| line.to_string()).collect(),
                _ => Vec::new(),
            },
        }
    }

    fn require_playing(&self) -> Result<()> {
        if self.phase == Phase::Playing {
            Ok(())
        } else {
            Err(GameError::NotPlaying { phase: self.phase })
        }
    }
}
