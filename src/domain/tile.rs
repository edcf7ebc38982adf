use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Number of tiles on the 3x3 board.
pub const BOARD_SIZE: usize = 9;
/// Number of matchable color pairs per layout.
pub const PAIR_COUNT: usize = 4;

/// Abstract color label of a tile. Rendering colors are up to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
}

impl TileColor {
    pub const PALETTE: [TileColor; 7] = [
        TileColor::Red,
        TileColor::Blue,
        TileColor::Green,
        TileColor::Yellow,
        TileColor::Purple,
        TileColor::Orange,
        TileColor::Pink,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TileColor::Red => "red",
            TileColor::Blue => "blue",
            TileColor::Green => "green",
            TileColor::Yellow => "yellow",
            TileColor::Purple => "purple",
            TileColor::Orange => "orange",
            TileColor::Pink => "pink",
        }
    }
}

impl fmt::Display for TileColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TileColor {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        TileColor::PALETTE
            .into_iter()
            .find(|color| color.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GameError::InvalidLayout(format!("unknown color '{}'", wanted)))
    }
}

/// The ordered colors of one round's board.
///
/// Always holds 9 tiles: four colors twice each plus one wildcard color
/// that appears exactly once and can never be matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayout([TileColor; BOARD_SIZE]);

impl TileLayout {
    pub fn new(colors: [TileColor; BOARD_SIZE]) -> Result<Self> {
        let mut counts: HashMap<TileColor, usize> = HashMap::new();
        for color in colors {
            *counts.entry(color).or_default() += 1;
        }

        let pairs = counts.values().filter(|&&n| n == 2).count();
        let singles = counts.values().filter(|&&n| n == 1).count();
        if pairs != PAIR_COUNT || singles != 1 {
            return Err(GameError::InvalidLayout(format!(
                "expected {} colors twice and one color once, got {} pairs and {} singles",
                PAIR_COUNT, pairs, singles
            )));
        }

        Ok(Self(colors))
    }

    /// Builds a layout from four pair colors and a wildcard, in board order
    /// `[p0, p0, p1, p1, p2, p2, p3, p3, wildcard]`, before any shuffling.
    pub fn from_parts(pairs: [TileColor; PAIR_COUNT], wildcard: TileColor) -> Result<Self> {
        let mut colors = [wildcard; BOARD_SIZE];
        for (i, color) in pairs.into_iter().enumerate() {
            colors[2 * i] = color;
            colors[2 * i + 1] = color;
        }
        Self::new(colors)
    }

    pub fn colors(&self) -> &[TileColor; BOARD_SIZE] {
        &self.0
    }

    pub fn color(&self, index: usize) -> Option<TileColor> {
        self.0.get(index).copied()
    }

    pub fn wildcard(&self) -> TileColor {
        let mut counts: HashMap<TileColor, usize> = HashMap::new();
        for color in self.0 {
            *counts.entry(color).or_default() += 1;
        }
        // new() guarantees exactly one singleton
        self.0
            .into_iter()
            .find(|color| counts[color] == 1)
            .unwrap_or(self.0[BOARD_SIZE - 1])
    }

    /// Reorders the tiles in place. The color multiset is unchanged.
    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        use rand::seq::SliceRandom;
        self.0.shuffle(rng);
    }
}

impl FromStr for TileLayout {
    type Err = GameError;

    /// Parses nine comma-separated color labels, e.g. `red,blue,red,...`.
    fn from_str(s: &str) -> Result<Self> {
        let colors = s
            .split(',')
            .map(str::parse::<TileColor>)
            .collect::<Result<Vec<TileColor>>>()?;
        let colors: [TileColor; BOARD_SIZE] = colors.try_into().map_err(|v: Vec<TileColor>| {
            GameError::InvalidLayout(format!("expected {} tiles, got {}", BOARD_SIZE, v.len()))
        })?;
        Self::new(colors)
    }
}
