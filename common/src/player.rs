use serde::{Deserialize, Serialize};
use crate::collision::hits_any_segment;
use crate::{GRID_STEP, PlayerRecord, Result};

/// A grid coordinate. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// The point `distance` units away in `direction`. Saturates at the
    /// edges of the `i32` range.
    pub fn step(self, direction: Direction, distance: i32) -> Point {
        let (dx, dy) = direction.offset(distance);
        Point { x: self.x.saturating_add(dx), y: self.y.saturating_add(dy) }
    }

    pub fn manhattan_distance(&self, other: &Point) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Point { x, y }
    }
}

impl From<Point> for [i32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        self.opposite() == *other
    }

    /// Screen coordinates: y grows downwards, so North decreases y.
    pub fn offset(&self, distance: i32) -> (i32, i32) {
        match self {
            Direction::North => (0, distance.saturating_neg()),
            Direction::East => (distance, 0),
            Direction::South => (0, distance),
            Direction::West => (distance.saturating_neg(), 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    nickname: String,
    trail: Vec<Point>,
    direction: Direction,
    active: bool,
    color: String,

    // Local input state, never transmitted
    turned_since_move: bool,
    buffered_turn: Option<Direction>,
}

impl Player {
    pub fn new(nickname: impl Into<String>, start: Point, direction: Direction, color: impl Into<String>) -> Self {
        Player {
            nickname: nickname.into(),
            trail: vec![start],
            direction,
            active: true,
            color: color.into(),
            turned_since_move: false,
            buffered_turn: None,
        }
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn head(&self) -> Point {
        *self.trail.last().expect("Player trail should not be empty")
    }

    pub fn path(&self) -> &[Point] {
        &self.trail
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Steer the player. Reversals and no-op turns are rejected.
    ///
    /// Only one turn takes effect between two moves. A second turn in the
    /// same tick is held back and applied right after the next move, otherwise
    /// two quick turns (N -> E -> S) would reverse the player into its own trail.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if !self.active {
            return false;
        }

        if self.turned_since_move {
            let effective = self.buffered_turn.unwrap_or(self.direction);
            if direction == effective || direction.is_opposite(&effective) {
                return false;
            }
            self.buffered_turn = Some(direction);
            return true;
        }

        if direction == self.direction || direction.is_opposite(&self.direction) {
            return false;
        }
        self.direction = direction;
        self.turned_since_move = true;
        true
    }

    /// Advance the head one grid step. `paths` is the pre-tick trail snapshot of
    /// every player; a step that would land on one of its segments is not taken.
    pub fn move_forward(&mut self, paths: &[Vec<Point>]) -> bool {
        if !self.active {
            return false;
        }

        let next = self.head().step(self.direction, GRID_STEP);
        let moved = if hits_any_segment(next, paths) {
            false
        } else {
            self.trail.push(next);
            true
        };

        self.turned_since_move = false;
        if let Some(direction) = self.buffered_turn.take() {
            if direction != self.direction && !direction.is_opposite(&self.direction) {
                self.direction = direction;
                self.turned_since_move = true;
            }
        }

        moved
    }

    /// Client-side elimination: stops the player and drops pending input.
    pub fn deactivate(&mut self) {
        if self.active {
            log::debug!("{} deactivated at {:?}", self.nickname, self.head());
        }
        self.active = false;
        self.turned_since_move = false;
        self.buffered_turn = None;
    }

    /// Authoritative elimination only flips the flag.
    pub(crate) fn mark_inactive(&mut self) {
        self.active = false;
    }

    /// Number of grid steps covered by the trail.
    pub fn calculate_length(&self) -> u32 {
        let units = self
            .trail
            .windows(2)
            .map(|pair| pair[0].manhattan_distance(&pair[1]))
            .fold(0u64, u64::saturating_add);
        u32::try_from(units / GRID_STEP as u64).unwrap_or(u32::MAX)
    }

    pub fn to_record(&self) -> PlayerRecord {
        PlayerRecord {
            nickname: self.nickname.clone(),
            trail: self.trail.clone(),
            direction: self.direction,
            active: self.active,
            color: self.color.clone(),
        }
    }

    /// Rebuilds a player from a plain record, rejecting records that break
    /// the trail invariants.
    pub fn from_record(record: &PlayerRecord) -> Result<Self> {
        record.validate()?;
        Ok(Self::from_valid_record(record))
    }

    pub(crate) fn from_valid_record(record: &PlayerRecord) -> Self {
        Player {
            nickname: record.nickname.clone(),
            trail: record.trail.clone(),
            direction: record.direction,
            active: record.active,
            color: record.color.clone(),
            turned_since_move: false,
            buffered_turn: None,
        }
    }
}
