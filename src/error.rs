use crate::domain::phase::Phase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Tile index {index} is outside the board (0..{board})")]
    TileOutOfRange { index: usize, board: usize },
    #[error("Tile {index} has already been matched")]
    TileAlreadyMatched { index: usize },
    #[error("The current round is already finished")]
    RoundFinished,
    #[error("Operation requires the playing phase, current phase is {phase}")]
    NotPlaying { phase: Phase },
    #[error("Cannot navigate from {from} to {to}")]
    InvalidTransition { from: Phase, to: Phase },
    #[error("Invalid tile layout: {0}")]
    InvalidLayout(String),
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl GameError {
    /// True for caller misuse that was rejected without touching state.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            GameError::TileOutOfRange { .. }
                | GameError::TileAlreadyMatched { .. }
                | GameError::RoundFinished
                | GameError::NotPlaying { .. }
                | GameError::InvalidTransition { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
