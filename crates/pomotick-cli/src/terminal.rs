//! Terminal plumbing for the interactive timer: raw mode, key input,
//! window title and the status line.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType, SetTitle};
use crossterm::{execute, queue};
use pomotick_core::{Intent, Mode, TimerPresenter};
use tokio::sync::mpsc::UnboundedSender;

const KEY_POLL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Intent(Intent),
    Quit,
}

/// Raw mode for as long as the guard lives.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!(error = %e, "failed to leave raw mode");
        }
    }
}

/// Space toggles, Escape resets, `p`/`s`/`l` switch mode, `q` quits.
pub fn key_to_input(key: KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') => Some(Input::Intent(Intent::Toggle)),
        KeyCode::Esc => Some(Input::Intent(Intent::Reset)),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Char('p') => Some(Input::Intent(Intent::SwitchMode(Mode::Pomodoro))),
        KeyCode::Char('s') => Some(Input::Intent(Intent::SwitchMode(Mode::ShortBreak))),
        KeyCode::Char('l') => Some(Input::Intent(Intent::SwitchMode(Mode::LongBreak))),
        KeyCode::Char('q') => Some(Input::Quit),
        _ => None,
    }
}

/// Read keys on a plain thread; crossterm's reader blocks.
/// The thread exits once the receiving side is dropped.
pub fn spawn_key_reader(tx: UnboundedSender<Input>) {
    std::thread::spawn(move || loop {
        match event::poll(KEY_POLL) {
            Ok(true) => match event::read() {
                Ok(TermEvent::Key(key)) => {
                    if let Some(input) = key_to_input(key) {
                        if tx.send(input).is_err() {
                            break;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "key reader stopped");
                    break;
                }
            },
            Ok(false) if tx.is_closed() => break,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "key reader stopped");
                break;
            }
        }
    });
}

pub fn set_title(title: &str) -> io::Result<()> {
    execute!(io::stdout(), SetTitle(title))
}

pub fn progress_bar(pct: f64, width: usize) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn status_line(presenter: &TimerPresenter, bar_width: usize) -> String {
    format!(
        "{:<11} {:>8} [{}] {:>3.0}% {}",
        presenter.mode().label(),
        presenter.duration().to_string(),
        progress_bar(presenter.progress_pct(), bar_width),
        presenter.progress_pct(),
        presenter.state().label(),
    )
}

/// Redraw the current line in place.
pub fn redraw(line: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    queue!(out, Clear(ClearType::CurrentLine))?;
    write!(out, "\r{line}")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keyboard_surface() {
        assert_eq!(
            key_to_input(press(KeyCode::Char(' '))),
            Some(Input::Intent(Intent::Toggle))
        );
        assert_eq!(key_to_input(press(KeyCode::Esc)), Some(Input::Intent(Intent::Reset)));
        assert_eq!(
            key_to_input(press(KeyCode::Char('l'))),
            Some(Input::Intent(Intent::SwitchMode(Mode::LongBreak)))
        );
        assert_eq!(
            key_to_input(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Quit)
        );
        assert_eq!(key_to_input(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(progress_bar(100.0, 4), "####");
        assert_eq!(progress_bar(50.0, 4), "##--");
        assert_eq!(progress_bar(0.0, 4), "----");
    }

    #[test]
    fn status_line_shows_mode_time_and_state() {
        let line = status_line(&TimerPresenter::default(), 10);
        assert!(line.starts_with("Pomodoro"));
        assert!(line.contains("25:00"));
        assert!(line.contains("[##########] 100% idle"));
    }
}
