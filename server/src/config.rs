use std::env;
use std::str::FromStr;
use std::time::Duration;
use anyhow::{Context, Result};
use common::{DEFAULT_ARENA_HEIGHT, DEFAULT_ARENA_WIDTH, Difficulty};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub arena_width: i32,
    pub arena_height: i32,
    pub difficulty: Difficulty,
    pub tick_interval: Duration,
    pub players: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let difficulty = Difficulty::default();
        ServerConfig {
            arena_width: DEFAULT_ARENA_WIDTH,
            arena_height: DEFAULT_ARENA_HEIGHT,
            difficulty,
            tick_interval: difficulty.tick_interval(),
            players: vec!["flynn".to_string(), "tron".to_string()],
        }
    }
}

impl ServerConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ServerConfig::default();

        let arena_width = parse_var(&lookup, "LIGHTCYCLE_ARENA_WIDTH")?.unwrap_or(defaults.arena_width);
        let arena_height = parse_var(&lookup, "LIGHTCYCLE_ARENA_HEIGHT")?.unwrap_or(defaults.arena_height);

        let difficulty = match lookup("LIGHTCYCLE_DIFFICULTY") {
            Some(value) => value
                .parse::<Difficulty>()
                .context("LIGHTCYCLE_DIFFICULTY must be Easy, Medium or Hard")?,
            None => defaults.difficulty,
        };

        let tick_interval = parse_var::<u64>(&lookup, "LIGHTCYCLE_TICK_MS")?
            .map(Duration::from_millis)
            .unwrap_or_else(|| difficulty.tick_interval());

        let players = match lookup("LIGHTCYCLE_PLAYERS") {
            Some(value) => value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.players,
        };

        Ok(ServerConfig {
            arena_width,
            arena_height,
            difficulty,
            tick_interval,
            players,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|value| value.trim().parse::<T>().with_context(|| format!("{} has invalid value {:?}", key, value)))
        .transpose()
}
