//! A mounted timer widget: one presenter, one countdown engine, one cue.
//!
//! The engine is acquired in [`TimerWidget::mount`] and released by
//! [`TimerWidget::unmount`], or by drop on any other exit path.
//!
//! ## Usage
//!
//! ```ignore
//! let mut widget = TimerWidget::mount(TimerPresenter::default(), SystemClock, SilentCue)?;
//! widget.handle(Intent::Start)?;
//! while let Some(event) = widget.next_event().await? {
//!     render(&event);
//! }
//! ```

use chrono::Utc;
use crate::cue::CompletionCue;
use crate::engine::{Clock, CountdownEngine, EngineCommand, EngineOutput, OutputReceiver};
use crate::error::Result;
use crate::events::Event;
use crate::timer::{Mode, Reaction, TimeUnit, TimerDuration, TimerPresenter, TimerState};

/// Something the user asked for, independent of how it was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    /// Start when idle, pause when running, resume when paused.
    Toggle,
    Pause,
    Resume,
    Reset,
    SwitchMode(Mode),
    Edit(TimeUnit, i64),
    SetDuration(TimerDuration),
}

pub struct TimerWidget<C: Clock, Q: CompletionCue> {
    presenter: TimerPresenter,
    engine: CountdownEngine,
    outputs: OutputReceiver,
    /// START/RESET commands sent so far; matches the engine's own count.
    generation: u64,
    clock: C,
    cue: Q,
}

impl<C: Clock, Q: CompletionCue> TimerWidget<C, Q> {
    /// Spawn the countdown engine and bind it to `presenter`.
    ///
    /// # Errors
    ///
    /// Fails when the engine cannot be spawned (no tokio runtime).
    pub fn mount(presenter: TimerPresenter, clock: C, cue: Q) -> Result<Self> {
        let (engine, outputs) = CountdownEngine::spawn(clock.clone())?;
        tracing::debug!(mode = %presenter.mode(), "timer widget mounted");
        Ok(Self {
            presenter,
            engine,
            outputs,
            generation: 0,
            clock,
            cue,
        })
    }

    pub fn presenter(&self) -> &TimerPresenter {
        &self.presenter
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.presenter.state(),
            mode: self.presenter.mode(),
            remaining: self.presenter.duration(),
            progress_pct: self.presenter.progress_pct(),
            title: self.presenter.title(),
            at: Utc::now(),
        }
    }

    /// Apply a user intent. Returns `None` when the intent was ignored in
    /// the current state.
    pub fn handle(&mut self, intent: Intent) -> Result<Option<Event>> {
        let now_ms = self.clock.now_ms();
        let command = match intent {
            Intent::Start => self.presenter.start(now_ms),
            Intent::Toggle => self.presenter.toggle(now_ms),
            Intent::Pause => self.presenter.pause(),
            Intent::Resume => self.presenter.resume(now_ms),
            Intent::Reset => Some(self.presenter.reset()),
            Intent::SwitchMode(mode) => {
                let command = self.presenter.switch_mode(mode);
                self.send(command)?;
                return Ok(Some(Event::ModeChanged {
                    mode,
                    duration: self.presenter.duration(),
                    at: Utc::now(),
                }));
            }
            Intent::Edit(unit, value) => {
                return Ok(self.presenter.edit(unit, value).then(|| self.edited()));
            }
            Intent::SetDuration(duration) => {
                return Ok(self.presenter.set_duration(duration).then(|| self.edited()));
            }
        };

        let Some(command) = command else {
            tracing::debug!(?intent, state = self.presenter.state().label(), "intent ignored");
            return Ok(None);
        };
        self.send(command)?;
        Ok(Some(self.transition(command)))
    }

    /// Wait for the next engine output that changes the display.
    ///
    /// Outputs from a countdown that has since been reset or restarted are
    /// skipped. Returns `Ok(None)` once the engine is gone.
    pub async fn next_event(&mut self) -> Result<Option<Event>> {
        while let Some(stamped) = self.outputs.recv_stamped().await {
            if stamped.generation != self.generation {
                tracing::trace!(
                    output = ?stamped.output,
                    generation = stamped.generation,
                    current = self.generation,
                    "output from an earlier countdown dropped"
                );
                continue;
            }
            if let Some(event) = self.apply_output(stamped.output)? {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    /// Release the engine.
    pub async fn unmount(self) {
        self.engine.shutdown().await;
        tracing::debug!("timer widget unmounted");
    }

    fn apply_output(&mut self, output: EngineOutput) -> Result<Option<Event>> {
        let at = Utc::now();
        match self.presenter.on_output(output) {
            Reaction::Ignored => {
                tracing::trace!(?output, "stale engine output ignored");
                Ok(None)
            }
            Reaction::Ticked {
                remaining_secs,
                progress_pct,
            } => Ok(Some(Event::TimerTick {
                remaining_secs,
                progress_pct,
                at,
            })),
            Reaction::Completed { mode } => {
                if let Err(e) = self.cue.play() {
                    tracing::warn!(error = %e, "completion cue failed");
                }
                self.send(EngineCommand::Reset)?;
                tracing::info!(%mode, "countdown completed");
                Ok(Some(Event::TimerCompleted { mode, at }))
            }
        }
    }

    fn send(&mut self, command: EngineCommand) -> Result<()> {
        if command.begins_generation() {
            self.generation += 1;
        }
        self.engine.send(command)?;
        Ok(())
    }

    fn edited(&self) -> Event {
        Event::DurationEdited {
            duration: self.presenter.duration(),
            at: Utc::now(),
        }
    }

    fn transition(&self, command: EngineCommand) -> Event {
        let at = Utc::now();
        let mode = self.presenter.mode();
        let remaining_secs = self.presenter.duration().total_secs();
        match command {
            EngineCommand::Start { end_time_ms } => Event::TimerStarted {
                mode,
                duration_secs: remaining_secs,
                end_time_ms,
                at,
            },
            EngineCommand::Pause => Event::TimerPaused { remaining_secs, at },
            EngineCommand::Resume => {
                let end_time_ms = match self.presenter.state() {
                    TimerState::Running { end_time_ms } => end_time_ms,
                    _ => self.clock.now_ms(),
                };
                Event::TimerResumed {
                    remaining_secs,
                    end_time_ms,
                    at,
                }
            }
            EngineCommand::Reset => Event::TimerReset { mode, at },
        }
    }
}
