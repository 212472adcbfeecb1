//! Integration tests for the countdown engine task.
//!
//! All tests run on a paused tokio clock, so "waiting ten seconds" is
//! instant and tick times are exact.

use std::time::Duration;

use pomotick_core::{
    Clock, CountdownEngine, EngineCommand, EngineOutput, MonotonicClock, OutputReceiver,
};
use tokio::time::Instant;

fn start_in(clock: &MonotonicClock, ms: i64) -> EngineCommand {
    EngineCommand::Start {
        end_time_ms: clock.now_ms() + ms,
    }
}

async fn collect_until_complete(outputs: &mut OutputReceiver) -> Vec<EngineOutput> {
    let mut seen = Vec::new();
    while let Some(output) = outputs.recv().await {
        seen.push(output);
        if output == EngineOutput::Complete {
            break;
        }
    }
    seen
}

async fn assert_silent_for(outputs: &mut OutputReceiver, secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
    assert!(outputs.try_recv().is_err(), "engine emitted output while it should be silent");
}

fn countdown_from(secs: u64) -> Vec<EngineOutput> {
    let mut expected: Vec<_> = (1..=secs).rev().map(EngineOutput::Tick).collect();
    expected.push(EngineOutput::Complete);
    expected
}

#[tokio::test(start_paused = true)]
async fn ten_second_countdown_ends_with_single_complete() {
    let clock = MonotonicClock::new();
    let (engine, mut outputs) = CountdownEngine::spawn(clock).unwrap();
    let started = Instant::now();

    engine.send(start_in(&clock, 10_000)).unwrap();

    assert_eq!(outputs.recv().await, Some(EngineOutput::Tick(9)));
    assert_eq!(started.elapsed(), Duration::from_secs(1));

    let mut rest = vec![EngineOutput::Tick(9)];
    rest.extend(collect_until_complete(&mut outputs).await);
    assert_eq!(rest, countdown_from(9));
    assert_eq!(started.elapsed(), Duration::from_secs(10));

    assert_silent_for(&mut outputs, 5).await;
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn resume_without_pause_changes_nothing() {
    let clock = MonotonicClock::new();
    let (engine, mut outputs) = CountdownEngine::spawn(clock).unwrap();
    let started = Instant::now();

    engine.send(start_in(&clock, 5_000)).unwrap();
    engine.send(EngineCommand::Resume).unwrap();

    assert_eq!(collect_until_complete(&mut outputs).await, countdown_from(4));
    assert_eq!(started.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn commands_before_start_are_ignored() {
    let clock = MonotonicClock::new();
    let (engine, mut outputs) = CountdownEngine::spawn(clock).unwrap();

    engine.send(EngineCommand::Resume).unwrap();
    engine.send(EngineCommand::Pause).unwrap();
    engine.send(EngineCommand::Resume).unwrap();

    assert_silent_for(&mut outputs, 3).await;
    assert!(engine.is_running());
}

async fn remaining_after_pause_of(pause: Duration) -> (u64, u64) {
    let clock = MonotonicClock::new();
    let (engine, mut outputs) = CountdownEngine::spawn(clock).unwrap();
    engine.send(start_in(&clock, 10_000)).unwrap();

    assert_eq!(outputs.recv().await, Some(EngineOutput::Tick(9)));
    let Some(EngineOutput::Tick(at_pause)) = outputs.recv().await else {
        panic!("expected a tick before pausing");
    };

    engine.send(EngineCommand::Pause).unwrap();
    assert_silent_for(&mut outputs, pause.as_secs()).await;
    engine.send(EngineCommand::Resume).unwrap();

    let Some(EngineOutput::Tick(after_resume)) = outputs.recv().await else {
        panic!("expected a tick after resuming");
    };
    (at_pause, after_resume)
}

#[tokio::test(start_paused = true)]
async fn pause_length_does_not_change_remaining_time() {
    let (at_pause, short) = remaining_after_pause_of(Duration::from_secs(3)).await;
    let (_, long) = remaining_after_pause_of(Duration::from_secs(600)).await;

    assert_eq!(at_pause, 8);
    assert_eq!(short, long);
    assert!(at_pause.abs_diff(short) <= 1);
}

#[tokio::test(start_paused = true)]
async fn rapid_toggling_keeps_a_single_tick_source() {
    let clock = MonotonicClock::new();
    let (engine, mut outputs) = CountdownEngine::spawn(clock).unwrap();
    let started = Instant::now();

    engine.send(start_in(&clock, 6_000)).unwrap();
    for _ in 0..10 {
        engine.send(EngineCommand::Pause).unwrap();
        engine.send(EngineCommand::Resume).unwrap();
        engine.send(EngineCommand::Resume).unwrap();
    }

    let mut tick_times = Vec::new();
    let mut seen = Vec::new();
    while let Some(output) = outputs.recv().await {
        tick_times.push(started.elapsed());
        seen.push(output);
        if output == EngineOutput::Complete {
            break;
        }
    }

    assert_eq!(seen, countdown_from(5));
    for pair in tick_times.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::from_secs(1));
    }
}

#[tokio::test(start_paused = true)]
async fn reset_stops_ticks() {
    let clock = MonotonicClock::new();
    let (engine, mut outputs) = CountdownEngine::spawn(clock).unwrap();

    engine.send(start_in(&clock, 10_000)).unwrap();
    assert_eq!(outputs.recv().await, Some(EngineOutput::Tick(9)));
    engine.send(EngineCommand::Reset).unwrap();

    assert_silent_for(&mut outputs, 15).await;

    // RESUME after RESET has nothing to resume.
    engine.send(EngineCommand::Resume).unwrap();
    assert_silent_for(&mut outputs, 3).await;
}

#[tokio::test(start_paused = true)]
async fn restart_replaces_running_countdown() {
    let clock = MonotonicClock::new();
    let (engine, mut outputs) = CountdownEngine::spawn(clock).unwrap();

    engine.send(start_in(&clock, 60_000)).unwrap();
    assert_eq!(outputs.recv().await, Some(EngineOutput::Tick(59)));
    engine.send(start_in(&clock, 3_000)).unwrap();

    assert_eq!(collect_until_complete(&mut outputs).await, countdown_from(2));
}

#[tokio::test(start_paused = true)]
async fn finish_drains_active_countdown_then_closes() {
    let clock = MonotonicClock::new();
    let (engine, mut outputs) = CountdownEngine::spawn(clock).unwrap();

    engine.send(start_in(&clock, 3_000)).unwrap();
    engine.finish();

    assert_eq!(collect_until_complete(&mut outputs).await, countdown_from(2));
    assert_eq!(outputs.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn finish_while_idle_closes_immediately() {
    let (engine, mut outputs) = CountdownEngine::spawn(MonotonicClock::new()).unwrap();
    engine.finish();
    assert_eq!(outputs.recv().await, None);
}
