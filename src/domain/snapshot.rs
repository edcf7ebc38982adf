use crate::domain::phase::Phase;
use crate::domain::round::RoundId;
use crate::domain::tile::TileColor;
use serde::{Deserialize, Serialize};

/// Read-only view of the game handed to the presentation layer after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub round_id: RoundId,
    pub phase: Phase,
    pub tile_colors: Vec<TileColor>,
    pub selected: Vec<usize>,
    pub matched: Vec<usize>,
    pub score: u8,
    pub high_score: u8,
    pub time_remaining_seconds: u32,
    pub message: String,
    pub finished: bool,
    /// Rule text, only filled on the guidelines screen.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guidelines: Vec<String>,
}
