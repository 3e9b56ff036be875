/// Distance a trail head travels on every tick, in arena units.
pub const GRID_STEP: i32 = 10;

/// Largest roster a single match accepts
pub const MAX_PLAYERS: usize = 16;

pub const DEFAULT_ARENA_WIDTH: i32 = 800;
pub const DEFAULT_ARENA_HEIGHT: i32 = 600;

/// Default tick interval in milliseconds for match loops
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 60;

/// Colors handed out in roster order when players don't pick one.
pub const PLAYER_COLORS: [&str; MAX_PLAYERS] = [
    "#00FFFF", "#FF00FF", "#FFFF00", "#00FF00",
    "#FF8000", "#FF0000", "#0080FF", "#FFFFFF",
    "#80FF00", "#FF0080", "#8000FF", "#00FF80",
    "#FFC0CB", "#A0A0A0", "#C08040", "#4080C0",
];
