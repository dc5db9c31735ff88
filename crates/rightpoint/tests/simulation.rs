use rand::SeedableRng;
use rand::rngs::StdRng;
use rightpoint::config::GameConfig;
use rightpoint::game::{GameController, Level, Phase};
use rightpoint::sys::session::Session;
use rightpoint::sys::simulate::{self, SimulationError};
use ringkit::{Color, Point, Sector, Viewport};
use tokio::runtime::Handle;

fn fast_config() -> GameConfig {
    GameConfig {
        win_pause_ms: 5,
        ..GameConfig::default()
    }
}

#[tokio::test]
async fn test_autopilot_clears_consecutive_levels() {
    let (tx, rx) = async_channel::unbounded();
    let game = GameController::with_seed(fast_config(), 42).unwrap();
    let mut session = Session::new(game, Viewport::new(640.0, 480.0), Handle::current(), tx);

    let report = simulate::run(&mut session, &rx, 3, 2_000).await.unwrap();

    assert_eq!(report.levels.len(), 3);
    let numbers: Vec<u32> = report.levels.iter().map(|l| l.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    for pair in report.levels.windows(2) {
        assert_eq!(pair[1].sectors, pair[0].sectors + 1);
    }
    assert!(report.levels.iter().all(|l| l.moves > 0));

    // the last win is left paused with its resume still pending
    assert_eq!(session.game().phase(), Phase::Paused);
    assert!(session.has_pending_resume());
}

#[tokio::test]
async fn test_known_board_is_solved_from_feedback_alone() {
    let (tx, rx) = async_channel::unbounded();
    let level = Level::new(
        1,
        Point::new(100.0, 100.0),
        [30.0, 50.0, 100.0]
            .iter()
            .map(|&v| Sector::new(v, Color::new(64, 16, 16)))
            .collect(),
    );
    let game = GameController::with_level(fast_config(), StdRng::seed_from_u64(7), level).unwrap();
    let mut session = Session::new(game, Viewport::new(1000.0, 1000.0), Handle::current(), tx);

    let report = simulate::run(&mut session, &rx, 2, 2_000).await.unwrap();

    assert_eq!(report.levels[0].sectors, 3);
    assert_eq!(report.levels[1].sectors, 4);
    assert_ne!(session.game().target(), Point::new(100.0, 100.0));
}

#[tokio::test]
async fn test_tiny_budget_reports_unsolved() {
    let (tx, rx) = async_channel::unbounded();
    let game = GameController::with_seed(fast_config(), 1).unwrap();
    let mut session = Session::new(game, Viewport::new(640.0, 480.0), Handle::current(), tx);

    let result = simulate::run(&mut session, &rx, 1, 1).await;
    // a single probe at the grid center only wins if the target happens to be close to it
    match session.game().phase() {
        Phase::Play => assert!(matches!(
            result,
            Err(SimulationError::Unsolved { level: 1, moves: 1 })
        )),
        Phase::Paused => assert!(result.is_ok()),
    }
}
