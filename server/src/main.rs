use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use common::{MatchSimulation, spawn_roster};
use server::config::ServerConfig;
use server::match_executor::spawn_match;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(
        width = config.arena_width,
        height = config.arena_height,
        difficulty = %config.difficulty,
        tick_interval = ?config.tick_interval,
        "Starting light cycle match with players {:?}",
        config.players
    );

    let players = spawn_roster(config.arena_width, config.arena_height, &config.players)
        .context("Failed to lay out the roster")?;
    let simulation = MatchSimulation::new(config.arena_width, config.arena_height, players, true, None)
        .context("Failed to create the match")?;

    let cancellation_token = CancellationToken::new();
    let (mut handle, task) = spawn_match(1, simulation, config.tick_interval, cancellation_token.clone());

    let events = tokio::spawn(async move {
        while let Some(event) = handle.events.recv().await {
            info!("Match event: {:?}", event);
        }
    });

    let ctrl_c_token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
            ctrl_c_token.cancel();
        }
    });

    let report = task.await.context("Match task panicked")?;
    events.await.context("Event task panicked")?;

    info!("Final report: {}", serde_json::to_string(&report)?);
    Ok(())
}
