//! Completion cues played once when a countdown finishes.

use std::io::Write;

/// Something audible (or visible) signalling that time is up.
pub trait CompletionCue: Send {
    fn play(&mut self) -> std::io::Result<()>;
}

/// Rings the terminal bell (ASCII BEL) `count` times.
///
/// The bell goes to stderr; stdout may be carrying machine-readable output.
#[derive(Debug, Clone, Copy)]
pub struct TerminalBell {
    count: u32,
}

impl TerminalBell {
    pub fn new(count: u32) -> Self {
        Self { count: count.max(1) }
    }

    fn ring(&self, out: &mut impl Write) -> std::io::Result<()> {
        for _ in 0..self.count {
            out.write_all(b"\x07")?;
        }
        out.flush()
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new(1)
    }
}

impl CompletionCue for TerminalBell {
    fn play(&mut self) -> std::io::Result<()> {
        self.ring(&mut std::io::stderr().lock())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl CompletionCue for SilentCue {
    fn play(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CompletionCue for Box<dyn CompletionCue> {
    fn play(&mut self) -> std::io::Result<()> {
        (**self).play()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counting(u32);

    impl CompletionCue for Counting {
        fn play(&mut self) -> std::io::Result<()> {
            self.0 += 1;
            Ok(())
        }
    }

    #[test]
    fn boxed_cues_delegate() {
        let mut cue: Box<dyn CompletionCue> = Box::new(SilentCue);
        cue.play().unwrap();
        let mut counting = Counting(0);
        counting.play().unwrap();
        assert_eq!(counting.0, 1);
    }

    #[test]
    fn bell_rings_at_least_once() {
        assert_eq!(TerminalBell::new(0).count, 1);
    }

    #[test]
    fn bell_writes_one_bel_per_count() {
        let mut out = Vec::new();
        TerminalBell::new(3).ring(&mut out).unwrap();
        assert_eq!(out, b"\x07\x07\x07");
    }
}
