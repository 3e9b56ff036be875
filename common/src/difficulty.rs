use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::SimulationError;

/// Match speed chosen in the lobby. Only the driver reads it; the simulation
/// itself advances one tick per call regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn tick_interval_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 60,
            Difficulty::Medium => 40,
            Difficulty::Hard => 25,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(SimulationError::UnknownDifficulty(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_difficulty() {
        assert_eq!("Easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(" HARD ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(
            "insane".parse::<Difficulty>(),
            Err(SimulationError::UnknownDifficulty("insane".to_string()))
        );
    }

    #[test]
    fn test_harder_is_faster() {
        assert!(Difficulty::Hard.tick_interval() < Difficulty::Medium.tick_interval());
        assert!(Difficulty::Medium.tick_interval() < Difficulty::Easy.tick_interval());
        assert_eq!(Difficulty::Easy.tick_interval_ms(), crate::DEFAULT_TICK_INTERVAL_MS);
    }
}
