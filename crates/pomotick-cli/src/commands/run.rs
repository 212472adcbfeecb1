use std::io::{IsTerminal, Write};

use clap::Args;
use pomotick_core::{
    CompletionCue, Config, Event, Intent, Mode, MonotonicClock, SilentCue, TerminalBell,
    TimerDuration, TimerPresenter, TimerWidget,
};
use tokio::sync::mpsc;

use crate::terminal::{self, Input, RawModeGuard};

#[derive(Args)]
pub struct RunArgs {
    /// Timer mode (pomodoro, short-break, long-break)
    #[arg(long, short)]
    mode: Option<Mode>,
    /// Countdown length as H:MM:SS, MM:SS or seconds (defaults to the mode's)
    #[arg(long, short)]
    duration: Option<TimerDuration>,
    /// Start counting immediately
    #[arg(long)]
    autostart: bool,
    /// Exit after the first completed countdown (implied without a terminal)
    #[arg(long)]
    exit_on_complete: bool,
    /// Do not ring the terminal bell on completion
    #[arg(long)]
    no_bell: bool,
    /// Print events as JSON lines instead of a status line
    #[arg(long)]
    json: bool,
}

struct View {
    json: bool,
    interactive: bool,
    set_title: bool,
    bar_width: usize,
}

impl View {
    fn render(&self, event: &Event, presenter: &TimerPresenter) -> Result<(), Box<dyn std::error::Error>> {
        if self.set_title {
            terminal::set_title(&presenter.title())?;
        }
        if self.json {
            let mut out = std::io::stdout().lock();
            out.write_all(self.json_line(event)?.as_bytes())?;
            out.flush()?;
            return Ok(());
        }

        let line = terminal::status_line(presenter, self.bar_width);
        if self.interactive {
            terminal::redraw(&line)?;
            if let Event::TimerCompleted { mode, .. } = event {
                print!("\r\n{mode} finished\r\n");
            }
        } else {
            println!("{line}");
        }
        Ok(())
    }

    /// Raw mode does not translate `\n`, so interactive lines end in `\r\n`.
    fn json_line(&self, event: &Event) -> serde_json::Result<String> {
        let ending = if self.interactive { "\r\n" } else { "\n" };
        Ok(format!("{}{ending}", serde_json::to_string(event)?))
    }

    fn finish(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.set_title {
            terminal::set_title("")?;
        }
        if self.interactive && !self.json {
            print!("\r\n");
        }
        Ok(())
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_widget(args, config))
}

async fn run_widget(args: RunArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let interactive = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
    if !interactive && !args.autostart {
        return Err("stdin is not a terminal; pass --autostart to run unattended".into());
    }

    let mut presenter = config.presenter(args.mode);
    if let Some(duration) = args.duration {
        presenter.set_duration(duration);
    }

    let cue: Box<dyn CompletionCue> = if args.no_bell || !config.notifications.enabled {
        Box::new(SilentCue)
    } else {
        Box::new(TerminalBell::new(config.notifications.bell_count))
    };

    let mut widget = TimerWidget::mount(presenter, MonotonicClock::new(), cue)?;
    let view = View {
        json: args.json,
        interactive,
        set_title: interactive && config.ui.set_terminal_title,
        bar_width: config.ui.bar_width as usize,
    };

    let (input_tx, mut inputs) = mpsc::unbounded_channel();
    let _raw_mode = if interactive {
        terminal::spawn_key_reader(input_tx);
        Some(RawModeGuard::enable()?)
    } else {
        drop(input_tx);
        None
    };
    let mut inputs_open = interactive;

    view.render(&widget.snapshot(), widget.presenter())?;
    if args.autostart {
        match widget.handle(Intent::Start)? {
            Some(event) => view.render(&event, widget.presenter())?,
            None if !interactive => {
                widget.unmount().await;
                return Err("nothing to count down; the duration is zero".into());
            }
            None => {}
        }
    }
    // Without a keyboard nothing can start another countdown.
    let exit_on_complete = args.exit_on_complete || !interactive;

    loop {
        tokio::select! {
            input = inputs.recv(), if inputs_open => match input {
                Some(Input::Quit) => break,
                Some(Input::Intent(intent)) => {
                    if let Some(event) = widget.handle(intent)? {
                        view.render(&event, widget.presenter())?;
                    }
                }
                None => inputs_open = false,
            },
            event = widget.next_event() => {
                let Some(event) = event? else {
                    return Err("countdown engine stopped unexpectedly".into());
                };
                view.render(&event, widget.presenter())?;
                if exit_on_complete && matches!(event, Event::TimerCompleted { .. }) {
                    break;
                }
            }
        }
    }

    view.finish()?;
    widget.unmount().await;
    Ok(())
}
