use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ROUND_SECONDS: u32 = 30;
pub const DEFAULT_COMPLETION_DELAY_MS: u64 = 2000;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Engine configuration, loadable from TOML.
///
/// Missing keys fall back to the defaults of the classic game: a 30 second
/// round, a one second tick and a two second pause after the last pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub round_seconds: u32,
    pub completion_delay_ms: u64,
    pub tick_interval_ms: u64,
    /// Arm a per-round ticker. Disable when an external clock calls `tick`.
    pub auto_tick: bool,
    /// Seed for the layout RNG. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_seconds: DEFAULT_ROUND_SECONDS,
            completion_delay_ms: DEFAULT_COMPLETION_DELAY_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            auto_tick: true,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Reads a TOML file and validates it.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.round_seconds == 0 {
            return Err(GameError::InvalidConfig(
                "round_seconds must be positive".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(GameError::InvalidConfig(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.completion_delay_ms == 0 {
            return Err(GameError::InvalidConfig(
                "completion_delay_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }
}
