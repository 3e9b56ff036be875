use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("match roster is empty")]
    EmptyRoster,

    #[error("roster has {count} players, at most {max} are allowed")]
    TooManyPlayers { count: usize, max: usize },

    #[error("arena bounds must be positive, got {width}x{height}")]
    InvalidBounds { width: i32, height: i32 },

    #[error("nickname {0:?} appears more than once in the roster")]
    DuplicateNickname(String),

    #[error("player {nickname:?} has trail point ({x}, {y}) outside the arena")]
    OutOfArena { nickname: String, x: i32, y: i32 },

    #[error("unknown difficulty {0:?}, expected Easy, Medium or Hard")]
    UnknownDifficulty(String),

    #[error("no player at roster index {0}")]
    UnknownPlayer(usize),

    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
