use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use common::{Direction, MatchResult, MatchSimulation, MatchSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchCommand {
    Turn { player: usize, direction: Direction },
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    PlayerDied { game_id: u32, player: usize, nickname: String },
    GameOver { game_id: u32, results: Vec<MatchResult> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub game_id: u32,
    pub ticks: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<MatchResult>,
}

pub struct MatchHandle {
    pub game_id: u32,
    pub commands: mpsc::UnboundedSender<MatchCommand>,
    /// Latest full state. Observers that join late or reconnect read this and
    /// replace their mirror wholesale.
    pub snapshots: watch::Receiver<MatchSnapshot>,
    pub events: mpsc::UnboundedReceiver<MatchEvent>,
}

impl MatchHandle {
    pub fn turn(&self, player: usize, direction: Direction) -> bool {
        self.commands.send(MatchCommand::Turn { player, direction }).is_ok()
    }

    pub fn stop(&self) -> bool {
        self.commands.send(MatchCommand::Stop).is_ok()
    }

    /// Rebuild a local mirror from the latest published state.
    pub fn latest_mirror(&self) -> common::Result<MatchSimulation> {
        common::reconstruct(&self.snapshots.borrow())
    }
}

/// Start the fixed-rate loop for one match on its own task.
pub fn spawn_match(
    game_id: u32,
    simulation: MatchSimulation,
    tick_interval: Duration,
    cancellation_token: CancellationToken,
) -> (MatchHandle, JoinHandle<MatchReport>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(simulation.snapshot());

    let task = tokio::spawn(run_match(
        game_id,
        simulation,
        tick_interval,
        command_rx,
        snapshot_tx,
        event_tx,
        cancellation_token,
    ));

    let handle = MatchHandle {
        game_id,
        commands: command_tx,
        snapshots: snapshot_rx,
        events: event_rx,
    };
    (handle, task)
}

/// Drive a match until it ends, a `Stop` arrives, or the token is cancelled.
///
/// Commands are only applied between ticks so observers never see a half
/// applied tick. An authoritative match never ends itself; this loop is the
/// one that stops it once the end rule is met.
pub async fn run_match(
    game_id: u32,
    mut simulation: MatchSimulation,
    tick_interval: Duration,
    mut commands: mpsc::UnboundedReceiver<MatchCommand>,
    snapshots: watch::Sender<MatchSnapshot>,
    events: mpsc::UnboundedSender<MatchEvent>,
    cancellation_token: CancellationToken,
) -> MatchReport {
    let started_at = Utc::now();
    let mut ticks = 0u64;
    info!(game_id, players = simulation.players().len(), "Match loop starting");

    let (died_tx, mut died_rx) = mpsc::unbounded_channel::<usize>();
    simulation.set_player_died_callback(Some(Box::new(move |index: usize| {
        if died_tx.send(index).is_err() {
            debug!("Death of player {} not delivered, match loop is gone", index);
        }
    })));

    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut commands_open = true;

    while simulation.is_running() {
        tokio::select! {
            biased;

            _ = cancellation_token.cancelled() => {
                info!(game_id, "Match loop cancelled");
                simulation.stop();
            }

            command = commands.recv(), if commands_open => {
                match command {
                    Some(MatchCommand::Turn { player, direction }) => {
                        match simulation.turn(player, direction) {
                            Ok(accepted) => debug!(game_id, player, ?direction, accepted, "Turn"),
                            Err(e) => warn!(game_id, error = %e, "Rejected turn"),
                        }
                    }
                    Some(MatchCommand::Stop) => {
                        info!(game_id, "Match stopped on request");
                        simulation.stop();
                    }
                    None => {
                        // Every handle is gone, keep ticking until the match ends
                        commands_open = false;
                    }
                }
            }

            _ = interval.tick() => {
                simulation.advance();
                ticks += 1;

                while let Ok(index) = died_rx.try_recv() {
                    let nickname = simulation
                        .player(index)
                        .map(|p| p.nickname().to_string())
                        .unwrap_or_default();
                    info!(game_id, player = index, %nickname, tick = ticks, "Player died");
                    publish(&events, game_id, MatchEvent::PlayerDied { game_id, player: index, nickname });
                }

                if simulation.is_running() && simulation.end_rule().is_reached(simulation.count_active()) {
                    simulation.stop();
                }

                snapshots.send_replace(simulation.snapshot());
            }
        }
    }

    // Publish the final state in case the stop came from a command or cancellation
    snapshots.send_replace(simulation.snapshot());

    let results = simulation.compute_results();
    info!(game_id, ticks, "Match over");
    publish(&events, game_id, MatchEvent::GameOver { game_id, results: results.clone() });

    MatchReport {
        game_id,
        ticks,
        started_at,
        finished_at: Utc::now(),
        results,
    }
}

/// Returns false when nobody is listening any more.
fn publish(events: &mpsc::UnboundedSender<MatchEvent>, game_id: u32, event: MatchEvent) -> bool {
    match events.send(event) {
        Ok(()) => true,
        Err(e) => {
            warn!(game_id, "Failed to publish match event {:?}: no listener", e.0);
            false
        }
    }
}
