use std::time::Duration;
use common::{Direction, MatchSimulation, Player, Point};
use server::match_executor::{MatchEvent, spawn_match};
use tokio_util::sync::CancellationToken;

fn authoritative(width: i32, height: i32, players: Vec<Player>) -> MatchSimulation {
    MatchSimulation::new(width, height, players, true, None).unwrap()
}

fn player(nickname: &str, x: i32, y: i32, direction: Direction) -> Player {
    Player::new(nickname, Point::new(x, y), direction, "#00FFFF")
}

#[tokio::test(start_paused = true)]
async fn test_duel_ends_when_one_player_is_left() {
    let _ = tracing_subscriber::fmt::try_init();

    let simulation = authoritative(
        100,
        100,
        vec![player("a", 10, 10, Direction::East), player("b", 90, 90, Direction::East)],
    );
    let (mut handle, task) = spawn_match(7, simulation, Duration::from_millis(50), CancellationToken::new());

    let report = task.await.unwrap();
    println!("Report: {:?}", report);
    assert_eq!(report.game_id, 7);
    assert_eq!(report.ticks, 2);
    assert_eq!(report.results[0].nickname, "a");
    assert!(report.results[0].alive);
    assert_eq!(report.results[0].score, 2);
    assert_eq!(report.results[1].nickname, "b");
    assert!(!report.results[1].alive);

    assert_eq!(
        handle.events.recv().await,
        Some(MatchEvent::PlayerDied { game_id: 7, player: 1, nickname: "b".to_string() })
    );
    match handle.events.recv().await {
        Some(MatchEvent::GameOver { game_id, results }) => {
            assert_eq!(game_id, 7);
            assert_eq!(results, report.results);
        }
        other => panic!("expected GameOver, got {:?}", other),
    }
    assert_eq!(handle.events.recv().await, None);

    let final_state = handle.snapshots.borrow().clone();
    assert!(!final_state.running);
    assert_eq!(final_state.players[0].trail.last(), Some(&Point::new(30, 10)));
}

#[tokio::test(start_paused = true)]
async fn test_turn_is_applied_before_next_tick() {
    let simulation = authoritative(1000, 1000, vec![player("solo", 100, 100, Direction::East)]);
    let (handle, task) = spawn_match(1, simulation, Duration::from_millis(50), CancellationToken::new());

    assert!(handle.turn(0, Direction::North));
    // Out of range turns are logged and ignored
    assert!(handle.turn(9, Direction::South));

    let mut snapshots = handle.snapshots.clone();
    snapshots.changed().await.unwrap();
    assert!(handle.stop());

    let report = task.await.unwrap();
    assert!(report.ticks >= 1);

    let mirror = handle.latest_mirror().unwrap();
    assert!(!mirror.is_running());
    assert!(mirror.is_authoritative());
    assert_eq!(mirror.players()[0].path()[1], Point::new(100, 90));
}

#[tokio::test(start_paused = true)]
async fn test_late_joiner_sees_initial_state() {
    let simulation = authoritative(500, 500, vec![player("a", 10, 10, Direction::South), player("b", 50, 10, Direction::South)]);
    let expected = simulation.snapshot();
    let (handle, task) = spawn_match(2, simulation, Duration::from_secs(1), CancellationToken::new());

    // Nothing has run yet on this single threaded runtime
    assert_eq!(*handle.snapshots.borrow(), expected);

    handle.stop();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_stops_the_match() {
    let simulation = authoritative(10_000, 10_000, vec![player("a", 10, 10, Direction::East), player("b", 10, 500, Direction::East)]);
    let token = CancellationToken::new();
    let (mut handle, task) = spawn_match(3, simulation, Duration::from_millis(10), token.clone());

    tokio::time::sleep(Duration::from_millis(95)).await;
    token.cancel();

    let report = task.await.unwrap();
    assert!(report.ticks > 0);
    assert!(report.results.iter().all(|r| r.alive));

    let mut saw_game_over = false;
    while let Some(event) = handle.events.recv().await {
        if matches!(event, MatchEvent::GameOver { game_id: 3, .. }) {
            saw_game_over = true;
        }
    }
    assert!(saw_game_over);
}
