use crate::domain::tile::{BOARD_SIZE, PAIR_COUNT, TileColor, TileLayout};
use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const MSG_CORRECT: &str = "Correct Selection!";
pub const MSG_WRONG: &str = "Wrong Selection";
pub const MSG_TIME_UP: &str = "Time's Up!";
pub const MSG_COMPLETED: &str = "Congratulations! You found all the pairs!";

/// Identity of a round within a session. Deferred timers compare against it
/// before touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundId(pub u64);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a single tap did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// First tile of a pair chosen.
    Picked,
    /// A still-selected tile was tapped again and deselected.
    Unpicked,
    Matched { pair: [usize; 2], completed: bool },
    Mismatched { pair: [usize; 2] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining: u32 },
    Expired,
}

/// One play session from a fresh layout to completion or timeout.
#[derive(Debug, Clone)]
pub struct Round {
    id: RoundId,
    layout: TileLayout,
    selected: BTreeSet<usize>,
    matched: BTreeSet<usize>,
    score: u8,
    time_remaining: u32,
    message: String,
}

impl Round {
    pub fn new(id: RoundId, layout: TileLayout, seconds: u32) -> Self {
        Self {
            id,
            layout,
            selected: BTreeSet::new(),
            matched: BTreeSet::new(),
            score: 0,
            time_remaining: seconds,
            message: String::new(),
        }
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn tile_colors(&self) -> &[TileColor; BOARD_SIZE] {
        self.layout.colors()
    }

    /// The color dealt once, which can never be matched.
    pub fn wildcard(&self) -> TileColor {
        self.layout.wildcard()
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn matched(&self) -> &BTreeSet<usize> {
        &self.matched
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// All pairs found. A finished round accepts no further taps or ticks.
    pub fn is_finished(&self) -> bool {
        usize::from(self.score) == PAIR_COUNT
    }

    /// Checks that `index` may be tapped, without changing anything.
    pub fn check_selectable(&self, index: usize) -> Result<()> {
        if self.is_finished() {
            return Err(GameError::RoundFinished);
        }
        if index >= BOARD_SIZE {
            return Err(GameError::TileOutOfRange {
                index,
                board: BOARD_SIZE,
            });
        }
        if self.matched.contains(&index) {
            return Err(GameError::TileAlreadyMatched { index });
        }
        Ok(())
    }

    /// Toggles `index` and resolves the pair once two tiles are selected.
    pub fn select_tile(&mut self, index: usize) -> Result<Selection> {
        self.check_selectable(index)?;

        if self.selected.remove(&index) {
            return Ok(Selection::Unpicked);
        }
        self.selected.insert(index);

        if self.selected.len() < 2 {
            return Ok(Selection::Picked);
        }

        let mut chosen = std::mem::take(&mut self.selected).into_iter();
        let (first, second) = match (chosen.next(), chosen.next()) {
            (Some(first), Some(second)) => (first, second),
            _ => return Ok(Selection::Picked),
        };
        Ok(self.evaluate(first, second))
    }

    fn evaluate(&mut self, first: usize, second: usize) -> Selection {
        let pair = [first, second];
        let same_color = self.layout.color(first) == self.layout.color(second);

        // a tile never pairs with itself
        if first != second && same_color {
            self.score += 1;
            self.matched.extend(pair);
            if self.is_finished() {
                self.message = MSG_COMPLETED.to_string();
            } else {
                self.message = MSG_CORRECT.to_string();
            }
            Selection::Matched {
                pair,
                completed: self.is_finished(),
            }
        } else {
            self.message = MSG_WRONG.to_string();
            Selection::Mismatched { pair }
        }
    }

    /// Counts down one second. `Expired` means the clock hit zero on this tick.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if self.is_finished() {
            return Err(GameError::RoundFinished);
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            Ok(TickOutcome::Expired)
        } else {
            Ok(TickOutcome::Running {
                remaining: self.time_remaining,
            })
        }
    }
}
