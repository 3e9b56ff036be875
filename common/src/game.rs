use std::collections::HashSet;
use std::fmt;
use serde::{Deserialize, Serialize};
use crate::{
    is_collision, is_out_of_bounds, Direction, MatchSnapshot, Player, Point, Result, SimulationError, GRID_STEP,
    MAX_PLAYERS,
};

pub type PlayerDiedCallback = Box<dyn FnMut(usize) + Send>;
pub type GameOverCallback = Box<dyn FnMut() + Send>;

/// How many active players may remain before the match is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndRule {
    /// Ends once one player (or none) is left.
    LastSurvivor,
    /// Ends only once everyone is out. Used for solo practice.
    AllEliminated,
}

impl EndRule {
    pub fn for_roster(players: usize) -> Self {
        if players <= 1 {
            EndRule::AllEliminated
        } else {
            EndRule::LastSurvivor
        }
    }

    pub fn threshold(&self) -> usize {
        match self {
            EndRule::LastSurvivor => 1,
            EndRule::AllEliminated => 0,
        }
    }

    pub fn is_reached(&self, active_players: usize) -> bool {
        active_players <= self.threshold()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub nickname: String,
    pub score: u32,
    pub alive: bool,
}

pub struct MatchSimulation {
    width: i32,
    height: i32,
    players: Vec<Player>,
    running: bool,
    is_authoritative: bool,
    end_rule: EndRule,

    on_player_died: Option<PlayerDiedCallback>,
    on_game_over: Option<GameOverCallback>,
}

impl MatchSimulation {
    pub fn new(
        width: i32,
        height: i32,
        players: Vec<Player>,
        is_authoritative: bool,
        on_game_over: Option<GameOverCallback>,
    ) -> Result<Self> {
        validate_roster(width, height, players.iter().map(|p| p.nickname()))?;
        for player in &players {
            validate_trail_in_arena(player.nickname(), player.path(), width, height)?;
        }

        Ok(MatchSimulation {
            width,
            height,
            end_rule: EndRule::for_roster(players.len()),
            players,
            running: true,
            is_authoritative,
            on_player_died: None,
            on_game_over,
        })
    }

    /// Assemble from parts that are already known to be valid.
    pub(crate) fn from_valid_parts(
        width: i32,
        height: i32,
        players: Vec<Player>,
        running: bool,
        is_authoritative: bool,
    ) -> Self {
        MatchSimulation {
            width,
            height,
            end_rule: EndRule::for_roster(players.len()),
            players,
            running,
            is_authoritative,
            on_player_died: None,
            on_game_over: None,
        }
    }

    pub fn with_end_rule(mut self, end_rule: EndRule) -> Self {
        self.end_rule = end_rule;
        self
    }

    pub fn set_player_died_callback(&mut self, callback: Option<PlayerDiedCallback>) {
        self.on_player_died = callback;
    }

    pub fn set_game_over_callback(&mut self, callback: Option<GameOverCallback>) {
        self.on_game_over = callback;
    }

    /// Run one tick.
    ///
    /// Every player is checked against the trails as they were before anyone
    /// moved this tick, so simultaneous crossings resolve the same way for
    /// everyone regardless of roster order.
    pub fn advance(&mut self) {
        if !self.running {
            return;
        }

        let paths: Vec<Vec<Point>> = self.players.iter().map(|p| p.path().to_vec()).collect();

        for index in 0..self.players.len() {
            let player = &self.players[index];
            let projected = player.head().step(player.direction(), GRID_STEP);
            let was_active = player.is_active();

            if is_collision(projected, &paths, self.width, self.height) {
                if was_active {
                    log::debug!("{} crashed at {:?}", player.nickname(), projected);
                    if let Some(callback) = self.on_player_died.as_mut() {
                        callback(index);
                    }
                }

                let player = &mut self.players[index];
                if self.is_authoritative {
                    player.mark_inactive();
                } else {
                    player.deactivate();
                }
            }

            // The server keeps tracking until it is told to stop, so only mirrors end here.
            if !self.is_authoritative
                && self.on_game_over.is_some()
                && self.end_rule.is_reached(self.count_active())
            {
                self.finish();
                return;
            }

            self.players[index].move_forward(&paths);
        }
    }

    fn finish(&mut self) {
        for player in self.players.iter_mut() {
            player.deactivate();
        }
        if let Some(callback) = self.on_game_over.as_mut() {
            callback();
        }
        self.running = false;
        log::info!("Match over after reaching {:?}", self.end_rule);
    }

    /// The explicit stop. Fires no callbacks.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Steer a player. Returns whether the turn was taken.
    pub fn turn(&mut self, index: usize, direction: Direction) -> Result<bool> {
        let running = self.running;
        let player = self.players.get_mut(index).ok_or(SimulationError::UnknownPlayer(index))?;
        if !running {
            return Ok(false);
        }
        Ok(player.turn(direction))
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_authoritative(&self) -> bool {
        self.is_authoritative
    }

    pub fn end_rule(&self) -> EndRule {
        self.end_rule
    }

    pub fn count_active(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// Alive players first, then by score descending. Ties keep roster order.
    pub fn compute_results(&self) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = self
            .players
            .iter()
            .map(|p| MatchResult {
                nickname: p.nickname().to_string(),
                score: p.calculate_length(),
                alive: p.is_active(),
            })
            .collect();

        // sort_by is stable
        results.sort_by(|a, b| b.alive.cmp(&a.alive).then_with(|| b.score.cmp(&a.score)));
        results
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            width: self.width,
            height: self.height,
            running: self.running,
            is_authoritative: self.is_authoritative,
            players: self.players.iter().map(Player::to_record).collect(),
        }
    }
}

impl fmt::Debug for MatchSimulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchSimulation")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("players", &self.players)
            .field("running", &self.running)
            .field("is_authoritative", &self.is_authoritative)
            .field("end_rule", &self.end_rule)
            .field("on_player_died", &self.on_player_died.is_some())
            .field("on_game_over", &self.on_game_over.is_some())
            .finish()
    }
}

pub(crate) fn validate_roster<'a>(
    width: i32,
    height: i32,
    nicknames: impl ExactSizeIterator<Item = &'a str>,
) -> Result<()> {
    if width <= 0 || height <= 0 {
        return Err(SimulationError::InvalidBounds { width, height });
    }

    let count = nicknames.len();
    if count == 0 {
        return Err(SimulationError::EmptyRoster);
    }
    if count > MAX_PLAYERS {
        return Err(SimulationError::TooManyPlayers { count, max: MAX_PLAYERS });
    }

    let mut seen = HashSet::new();
    for nickname in nicknames {
        if !seen.insert(nickname) {
            return Err(SimulationError::DuplicateNickname(nickname.to_string()));
        }
    }

    Ok(())
}

/// Every trail point must sit inside the arena, border lines included.
pub(crate) fn validate_trail_in_arena(nickname: &str, trail: &[Point], width: i32, height: i32) -> Result<()> {
    match trail.iter().find(|point| is_out_of_bounds(**point, width, height)) {
        Some(point) => Err(SimulationError::OutOfArena {
            nickname: nickname.to_string(),
            x: point.x,
            y: point.y,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_rule_thresholds() {
        assert_eq!(EndRule::for_roster(1), EndRule::AllEliminated);
        assert_eq!(EndRule::for_roster(4), EndRule::LastSurvivor);
        assert!(EndRule::LastSurvivor.is_reached(1));
        assert!(!EndRule::AllEliminated.is_reached(1));
        assert!(EndRule::AllEliminated.is_reached(0));
    }

    #[test]
    fn test_rejects_bad_construction() {
        let player = || Player::new("a", Point::new(10, 10), Direction::East, "#FFFFFF");

        let err = MatchSimulation::new(0, 100, vec![player()], true, None).unwrap_err();
        assert_eq!(err, SimulationError::InvalidBounds { width: 0, height: 100 });

        let outside = Player::new("far", Point::new(-10, 50), Direction::East, "#FFFFFF");
        let err = MatchSimulation::new(100, 100, vec![outside], true, None).unwrap_err();
        assert_eq!(err, SimulationError::OutOfArena { nickname: "far".to_string(), x: -10, y: 50 });

        let err = MatchSimulation::new(100, 100, Vec::new(), true, None).unwrap_err();
        assert_eq!(err, SimulationError::EmptyRoster);

        let err = MatchSimulation::new(100, 100, vec![player(), player()], true, None).unwrap_err();
        assert_eq!(err, SimulationError::DuplicateNickname("a".to_string()));

        let crowd: Vec<Player> = (0..=MAX_PLAYERS)
            .map(|i| Player::new(format!("p{}", i), Point::new(10, 10), Direction::East, "#FFFFFF"))
            .collect();
        let err = MatchSimulation::new(100, 100, crowd, true, None).unwrap_err();
        assert_eq!(err, SimulationError::TooManyPlayers { count: MAX_PLAYERS + 1, max: MAX_PLAYERS });
    }
}
