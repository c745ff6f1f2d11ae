use std::io::{self, Write};
use std::time::Instant;

use letterwheel::ports::AudioPort;

const BELL: &[u8] = b"\x07";

/// Terminal stand-in for the sound effects: the ticking loop becomes an
/// on-screen pulse and the alarm rings the terminal bell.
pub struct TerminalAudio {
    out: Box<dyn Write>,
    ticking_since: Option<Instant>,
    alarms_rung: u32,
}

impl TerminalAudio {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self {
            out,
            ticking_since: None,
            alarms_rung: 0,
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn silent() -> Self {
        Self::new(Box::new(io::sink()))
    }

    /// Whether the pulse is in its "on" half second
    pub fn pulse(&self, now: Instant) -> bool {
        self.ticking_since
            .map(|since| now.saturating_duration_since(since).as_millis() % 1000 < 500)
            .unwrap_or(false)
    }

    pub fn alarms_rung(&self) -> u32 {
        self.alarms_rung
    }
}

impl AudioPort for TerminalAudio {
    fn play_ticking(&mut self) {
        // restarting always rewinds to the first beat
        self.ticking_since = Some(Instant::now());
    }

    fn stop_ticking(&mut self) {
        self.ticking_since = None;
    }

    fn play_alarm(&mut self) {
        self.alarms_rung += 1;
        if let Err(e) = self.out.write_all(BELL).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "could not ring the terminal bell");
        }
    }
}
