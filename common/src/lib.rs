mod collision;
mod constants;
mod difficulty;
mod error;
mod game;
mod player;
mod snapshot;
mod spawn;

pub use collision::*;
pub use constants::*;
pub use difficulty::*;
pub use error::*;
pub use game::*;
pub use player::*;
pub use snapshot::*;
pub use spawn::*;
