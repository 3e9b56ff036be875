use serde::{Deserialize, Serialize};
use crate::game::{validate_roster, validate_trail_in_arena};
use crate::{Direction, MatchSimulation, Player, Point, Result, SimulationError};

/// Plain data for one player, as it crosses the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerRecord {
    pub nickname: String,
    pub trail: Vec<Point>,
    pub direction: Direction,
    pub active: bool,
    pub color: String,
}

impl PlayerRecord {
    pub fn validate(&self) -> Result<()> {
        if self.trail.is_empty() {
            return Err(malformed(format!("player {:?} has an empty trail", self.nickname)));
        }

        for pair in self.trail.windows(2) {
            if pair[0].x != pair[1].x && pair[0].y != pair[1].y {
                return Err(malformed(format!(
                    "player {:?} has a diagonal segment {:?} -> {:?}",
                    self.nickname, pair[0], pair[1]
                )));
            }
        }

        Ok(())
    }
}

/// Everything a mirror needs to rebuild a match. Callbacks and local
/// configuration are never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub width: i32,
    pub height: i32,
    pub running: bool,
    pub is_authoritative: bool,
    pub players: Vec<PlayerRecord>,
}

impl MatchSnapshot {
    /// Parse and validate a snapshot received from the wire.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: MatchSnapshot = serde_json::from_str(json).map_err(|e| malformed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| malformed(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        validate_roster(self.width, self.height, self.players.iter().map(|p| p.nickname.as_str()))
            .map_err(|e| malformed(e.to_string()))?;

        for record in &self.players {
            record.validate()?;
            validate_trail_in_arena(&record.nickname, &record.trail, self.width, self.height)
                .map_err(|e| malformed(e.to_string()))?;
        }

        Ok(())
    }
}

/// Build a fresh simulation from a snapshot. Nothing is built unless the
/// whole snapshot is valid.
pub fn reconstruct(snapshot: &MatchSnapshot) -> Result<MatchSimulation> {
    snapshot.validate()?;
    log::debug!(
        "Reconstructing {}x{} match with {} players",
        snapshot.width,
        snapshot.height,
        snapshot.players.len()
    );
    Ok(assemble(snapshot))
}

fn assemble(snapshot: &MatchSnapshot) -> MatchSimulation {
    let players = snapshot.players.iter().map(Player::from_valid_record).collect();
    MatchSimulation::from_valid_parts(
        snapshot.width,
        snapshot.height,
        players,
        snapshot.running,
        snapshot.is_authoritative,
    )
}

impl MatchSimulation {
    pub fn from_snapshot(snapshot: &MatchSnapshot) -> Result<Self> {
        reconstruct(snapshot)
    }

    /// An independent copy with the same data and no callbacks.
    ///
    /// Same result as `reconstruct(&self.snapshot())`; a live match always
    /// produces a valid snapshot so there is nothing to fail.
    pub fn mirror(&self) -> MatchSimulation {
        assemble(&self.snapshot())
    }
}

fn malformed(reason: String) -> SimulationError {
    SimulationError::MalformedSnapshot(reason)
}
