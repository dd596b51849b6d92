//! Tests for the async session driver.

use std::time::Duration;
use strictly_noughts::{
    Cell, DriverError, GameEvent, GameOutcome, Mark, MoveRejection, ParticipantCount,
    SessionConfig, SessionDriver,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

async fn next_event(events: &mut UnboundedReceiver<GameEvent>) -> GameEvent {
    timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("event within timeout")
        .expect("channel open")
}

#[tokio::test]
async fn test_engine_reply_lands_after_delay() {
    let config = SessionConfig::new(ParticipantCount::One).with_think_delay_ms(20);
    let (driver, mut events) = SessionDriver::new(config);
    assert!(matches!(
        next_event(&mut events).await,
        GameEvent::Restarted { .. }
    ));

    driver.apply_human_move(0).expect("lock");
    let view = driver.view().expect("lock");
    assert!(view.engine_thinking);
    assert!(matches!(view.cells[4], Cell::Empty));

    assert_eq!(
        next_event(&mut events).await,
        GameEvent::AutomatedMove {
            index: 4,
            outcome: GameOutcome::InProgress,
        }
    );
    let view = driver.view().expect("lock");
    assert_eq!(view.cells[4], Cell::Occupied(Mark::O));
    assert_eq!(view.current_mark, Mark::X);
    assert!(!view.engine_thinking);
}

#[tokio::test]
async fn test_reset_cancels_pending_move() {
    let config = SessionConfig::new(ParticipantCount::One).with_think_delay_ms(200);
    let (driver, mut events) = SessionDriver::new(config);
    let GameEvent::Restarted { generation } = next_event(&mut events).await else {
        panic!("expected restart event");
    };

    driver.apply_human_move(0).expect("lock");
    driver.reset().expect("lock");
    assert_eq!(
        next_event(&mut events).await,
        GameEvent::Restarted {
            generation: generation + 1
        }
    );

    // The engine move scheduled before the reset must never arrive.
    assert!(
        timeout(Duration::from_millis(400), events.recv())
            .await
            .is_err()
    );
    let view = driver.view().expect("lock");
    assert!(view.cells.iter().all(|c| *c == Cell::Empty));
    assert_eq!(view.current_mark, Mark::X);
}

#[tokio::test]
async fn test_human_move_ignored_while_engine_thinks() {
    let config = SessionConfig::new(ParticipantCount::One).with_think_delay_ms(50);
    let (driver, mut events) = SessionDriver::new(config);
    next_event(&mut events).await;

    driver.apply_human_move(0).expect("lock");
    driver.apply_human_move(1).expect("lock");
    assert_eq!(driver.view().expect("lock").cells[1], Cell::Empty);

    assert!(matches!(
        next_event(&mut events).await,
        GameEvent::AutomatedMove { index: 4, .. }
    ));
}

#[tokio::test]
async fn test_self_play_runs_to_a_draw() {
    let config = SessionConfig::new(ParticipantCount::Zero).with_think_delay_ms(1);
    let (driver, mut events) = SessionDriver::new(config);
    assert!(matches!(
        next_event(&mut events).await,
        GameEvent::Restarted { .. }
    ));

    let mut moves = 0;
    loop {
        match next_event(&mut events).await {
            GameEvent::AutomatedMove { outcome, .. } => {
                moves += 1;
                if outcome.is_terminal() {
                    assert_eq!(outcome, GameOutcome::Draw);
                    break;
                }
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(moves, 9);
    assert_eq!(driver.view().expect("lock").outcome, GameOutcome::Draw);
}

#[tokio::test]
async fn test_start_switches_to_two_humans() {
    let config = SessionConfig::new(ParticipantCount::One).with_think_delay_ms(20);
    let (driver, mut events) = SessionDriver::new(config);
    next_event(&mut events).await;

    driver.start(ParticipantCount::Two).expect("lock");
    assert!(matches!(
        next_event(&mut events).await,
        GameEvent::Restarted { .. }
    ));

    driver.apply_human_move(0).expect("lock");
    driver.apply_human_move(1).expect("lock");
    let view = driver.view().expect("lock");
    assert_eq!(view.cells[0], Cell::Occupied(Mark::X));
    assert_eq!(view.cells[1], Cell::Occupied(Mark::O));
    assert!(!view.engine_thinking);
    assert_eq!(
        driver
            .with_session(|s| *s.config().participants())
            .expect("lock"),
        ParticipantCount::Two
    );
}

#[tokio::test]
async fn test_restart_announced_before_inline_opening_move() {
    let config = SessionConfig::new(ParticipantCount::One)
        .with_think_delay_ms(0)
        .with_human_mark(Mark::O);
    let (driver, mut events) = SessionDriver::new(config);

    let GameEvent::Restarted { generation } = next_event(&mut events).await else {
        panic!("expected restart event first");
    };
    assert_eq!(
        next_event(&mut events).await,
        GameEvent::AutomatedMove {
            index: 0,
            outcome: GameOutcome::InProgress,
        }
    );

    driver.reset().expect("lock");
    assert_eq!(
        next_event(&mut events).await,
        GameEvent::Restarted {
            generation: generation + 1
        }
    );
    assert!(matches!(
        next_event(&mut events).await,
        GameEvent::AutomatedMove { index: 0, .. }
    ));
    let view = driver.view().expect("lock");
    assert_eq!(view.generation, generation + 1);
    assert_eq!(view.cells[0], Cell::Occupied(Mark::X));
    assert_eq!(view.current_mark, Mark::O);
}

#[tokio::test]
async fn test_zero_delay_reply_follows_human_move() {
    let config = SessionConfig::new(ParticipantCount::One).with_think_delay_ms(0);
    let (driver, mut events) = SessionDriver::new(config);
    next_event(&mut events).await;

    let applied = driver.try_human_move(0).expect("legal");
    assert_eq!(applied.index, 0);
    assert_eq!(
        next_event(&mut events).await,
        GameEvent::AutomatedMove {
            index: 4,
            outcome: GameOutcome::InProgress,
        }
    );
}

#[tokio::test]
async fn test_try_human_move_reports_rejection() {
    let config = SessionConfig::new(ParticipantCount::One).with_think_delay_ms(50);
    let (driver, mut events) = SessionDriver::new(config);
    next_event(&mut events).await;

    driver.try_human_move(0).expect("legal");
    assert_eq!(
        driver.try_human_move(1),
        Err(DriverError::Rejected(MoveRejection::NotHumanTurn(Mark::O)))
    );
    next_event(&mut events).await;
    assert_eq!(
        driver.try_human_move(4),
        Err(DriverError::Rejected(MoveRejection::CellOccupied(4)))
    );
}
