//! Scheduler behavior under paused time: exactly-once delivery,
//! cancel-before-fire, and generation replacement.

use std::time::Duration;

use duelhall_protocol::RoomId;
use duelhall_timer::{DeadlineScheduler, TimerClass, TimerFired};
use tokio::sync::mpsc;
use tokio::time;

const ROOM: RoomId = RoomId(7);

#[tokio::test(start_paused = true)]
async fn test_armed_timer_fires_once() {
    let scheduler = DeadlineScheduler::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let generation = scheduler.arm(ROOM, TimerClass::Turn, Duration::from_secs(30), tx);
    time::sleep(Duration::from_secs(31)).await;

    assert_eq!(
        rx.recv().await,
        Some(TimerFired {
            room: ROOM,
            class: TimerClass::Turn,
            generation,
        })
    );
    assert!(rx.try_recv().is_err());
    assert_eq!(scheduler.armed_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_fire_suppresses_delivery() {
    let scheduler = DeadlineScheduler::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    scheduler.arm(ROOM, TimerClass::Turn, Duration::from_secs(10), tx);
    time::sleep(Duration::from_secs(5)).await;
    scheduler.cancel(ROOM, TimerClass::Turn);
    time::sleep(Duration::from_secs(10)).await;

    assert!(rx.try_recv().is_err());
    assert_eq!(scheduler.armed_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_rearm_delivers_only_latest_generation() {
    let scheduler = DeadlineScheduler::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    scheduler.arm(ROOM, TimerClass::Turn, Duration::from_secs(10), tx.clone());
    time::sleep(Duration::from_secs(5)).await;
    let second = scheduler.arm(ROOM, TimerClass::Turn, Duration::from_secs(10), tx);
    time::sleep(Duration::from_secs(20)).await;

    let fired = rx.recv().await.unwrap();
    assert_eq!(fired.generation, second);
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_after_fire_is_noop() {
    let scheduler = DeadlineScheduler::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    scheduler.arm(ROOM, TimerClass::Round, Duration::from_secs(2), tx);
    time::sleep(Duration::from_secs(3)).await;
    scheduler.cancel(ROOM, TimerClass::Round);

    assert!(rx.recv().await.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_classes_are_independent() {
    let scheduler = DeadlineScheduler::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    scheduler.arm(ROOM, TimerClass::Turn, Duration::from_secs(30), tx.clone());
    scheduler.arm(ROOM, TimerClass::Round, Duration::from_secs(2), tx);
    scheduler.cancel(ROOM, TimerClass::Turn);
    time::sleep(Duration::from_secs(3)).await;

    let fired = rx.recv().await.unwrap();
    assert_eq!(fired.class, TimerClass::Round);
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_all_clears_only_that_room() {
    let scheduler = DeadlineScheduler::new();
    let other = RoomId(8);
    let (tx, mut rx) = mpsc::unbounded_channel();

    scheduler.arm(ROOM, TimerClass::Turn, Duration::from_secs(5), tx.clone());
    scheduler.arm(ROOM, TimerClass::Round, Duration::from_secs(5), tx.clone());
    scheduler.arm(other, TimerClass::Turn, Duration::from_secs(5), tx);
    scheduler.cancel_all(ROOM);
    assert_eq!(scheduler.armed_count(), 1);

    time::sleep(Duration::from_secs(6)).await;
    let fired = rx.recv().await.unwrap();
    assert_eq!(fired.room, other);
    assert!(rx.try_recv().is_err());
}
