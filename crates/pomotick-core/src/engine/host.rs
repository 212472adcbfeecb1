use std::time::Duration;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use super::clock::Clock;
use super::countdown::{Countdown, TickSource};
use super::message::{EngineCommand, EngineOutput};
use crate::error::EngineError;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// An engine output tagged with the countdown generation that produced it.
///
/// The engine counts START and RESET commands in the order it receives
/// them. A client that counts the commands it sends the same way can tell
/// outputs of a replaced countdown apart from current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampedOutput {
    pub generation: u64,
    pub output: EngineOutput,
}

/// Receiving side of the engine's output channel.
#[derive(Debug)]
pub struct OutputReceiver {
    rx: UnboundedReceiver<StampedOutput>,
}

impl OutputReceiver {
    /// Next output, without its generation.
    pub async fn recv(&mut self) -> Option<EngineOutput> {
        self.rx.recv().await.map(|stamped| stamped.output)
    }

    pub async fn recv_stamped(&mut self) -> Option<StampedOutput> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Result<EngineOutput, TryRecvError> {
        self.rx.try_recv().map(|stamped| stamped.output)
    }
}

/// Handle to a countdown running on its own tokio task.
///
/// Commands and outputs travel over unbounded FIFO channels; neither side
/// waits on the other. Dropping the handle aborts the task.
#[derive(Debug)]
pub struct CountdownEngine {
    commands: Option<UnboundedSender<EngineCommand>>,
    task: Option<JoinHandle<()>>,
}

impl CountdownEngine {
    /// Spawn the engine task on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SpawnFailed`] when called outside a runtime.
    pub fn spawn<C: Clock>(
        clock: C,
    ) -> Result<(Self, OutputReceiver), EngineError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| EngineError::SpawnFailed(e.to_string()))?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let task = runtime.spawn(run(clock, command_rx, output_tx));
        tracing::debug!("countdown engine spawned");

        Ok((
            Self {
                commands: Some(command_tx),
                task: Some(task),
            },
            OutputReceiver { rx: output_rx },
        ))
    }

    pub fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.commands
            .as_ref()
            .ok_or(EngineError::Closed)?
            .send(command)
            .map_err(|_| EngineError::Closed)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the countdown and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.commands.take();
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        tracing::debug!("countdown engine shut down");
    }

    /// Stop accepting commands but let an active countdown run to
    /// completion. The output channel closes once the task exits.
    pub fn finish(mut self) {
        self.commands.take();
        // Detach: dropping a JoinHandle does not abort the task.
        self.task.take();
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn new_ticker() -> Interval {
    let mut ticker = tokio::time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn run<C: Clock>(
    clock: C,
    mut commands: UnboundedReceiver<EngineCommand>,
    outputs: UnboundedSender<StampedOutput>,
) {
    let mut countdown = Countdown::new();
    let mut generation: u64 = 0;
    // At most one tick source exists; replacing it drops the old one.
    let mut ticker: Option<Interval> = None;
    let mut commands_open = true;

    loop {
        if !commands_open && ticker.is_none() {
            break;
        }

        tokio::select! {
            biased;

            command = commands.recv(), if commands_open => {
                let Some(command) = command else {
                    commands_open = false;
                    tracing::trace!("command channel closed, draining countdown");
                    continue;
                };
                if command.begins_generation() {
                    generation += 1;
                }
                match countdown.apply(command, clock.now_ms()) {
                    TickSource::Restart => {
                        ticker = Some(new_ticker());
                        tracing::debug!(command = command.name(), end_time_ms = ?countdown.end_time_ms(), "countdown ticking");
                    }
                    TickSource::Cancel => {
                        ticker = None;
                        tracing::debug!(command = command.name(), "countdown stopped");
                    }
                    TickSource::Unchanged => {
                        tracing::debug!(command = command.name(), "command ignored in current state");
                    }
                }
            }

            _ = next_tick(&mut ticker) => {
                let Some(output) = countdown.tick(clock.now_ms()) else {
                    ticker = None;
                    continue;
                };
                if output == EngineOutput::Complete {
                    ticker = None;
                    tracing::debug!("countdown complete");
                } else {
                    tracing::trace!(?output, "tick");
                }
                if outputs.send(StampedOutput { generation, output }).is_err() {
                    tracing::debug!("output receiver dropped, stopping engine");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MonotonicClock;

    #[test]
    fn spawn_outside_runtime_fails() {
        let err = CountdownEngine::spawn(MonotonicClock::new()).unwrap_err();
        assert!(matches!(err, EngineError::SpawnFailed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_joins_task() {
        let (engine, _outputs) = CountdownEngine::spawn(MonotonicClock::new()).unwrap();
        assert!(engine.is_running());
        engine.send(EngineCommand::Reset).unwrap();
        engine.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn outputs_carry_generation_of_their_start() {
        let clock = MonotonicClock::new();
        let (engine, mut outputs) = CountdownEngine::spawn(clock).unwrap();
        engine
            .send(EngineCommand::Start { end_time_ms: clock.now_ms() + 5_000 })
            .unwrap();
        let first = outputs.recv_stamped().await.unwrap();
        assert_eq!(first, StampedOutput { generation: 1, output: EngineOutput::Tick(4) });

        engine.send(EngineCommand::Pause).unwrap();
        engine.send(EngineCommand::Resume).unwrap();
        assert_eq!(outputs.recv_stamped().await.unwrap().generation, 1);

        engine.send(EngineCommand::Reset).unwrap();
        engine
            .send(EngineCommand::Start { end_time_ms: clock.now_ms() + 5_000 })
            .unwrap();
        assert_eq!(outputs.recv_stamped().await.unwrap().generation, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_closes_outputs() {
        let clock = MonotonicClock::new();
        let (engine, mut outputs) = CountdownEngine::spawn(clock).unwrap();
        engine
            .send(EngineCommand::Start { end_time_ms: clock.now_ms() + 5_000 })
            .unwrap();
        drop(engine);
        assert_eq!(outputs.recv().await, None);
    }
}
