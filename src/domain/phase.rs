use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse navigation state of the game screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Start,
    Guidelines,
    Scoreboard,
    Playing,
}

impl Phase {
    /// Whether a user-requested navigation from `self` to `to` is allowed.
    ///
    /// Every secondary screen only leads back to `Start`; `Start` fans out to
    /// all of them.
    pub fn can_navigate_to(self, to: Phase) -> bool {
        matches!(
            (self, to),
            (Phase::Start, Phase::Playing)
                | (Phase::Start, Phase::Guidelines)
                | (Phase::Start, Phase::Scoreboard)
                | (Phase::Guidelines, Phase::Start)
                | (Phase::Scoreboard, Phase::Start)
                | (Phase::Playing, Phase::Start)
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::Guidelines => "guidelines",
            Phase::Scoreboard => "scoreboard",
            Phase::Playing => "playing",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = crate::error::GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Phase::Start),
            "guidelines" => Ok(Phase::Guidelines),
            "scoreboard" => Ok(Phase::Scoreboard),
            "playing" => Ok(Phase::Playing),
            other => Err(crate::error::GameError::InvalidEvent(format!(
                "unknown phase '{}'",
                other
            ))),
        }
    }
}
