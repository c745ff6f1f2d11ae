use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// How often the loop wakes up to poll the game clock when no input arrives
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Unified event type consumed by the game loop
#[derive(Clone, Debug)]
pub enum WheelEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The event source hung up; no more input will arrive
    Closed,
}

/// Source of terminal events (keys, resizes)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<WheelEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread and forwards them over a channel
pub struct CrosstermEventSource {
    rx: Receiver<WheelEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // windows reports key releases too; only presses drive the game
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    Some(WheelEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => Some(WheelEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };

            if let Some(ev) = forwarded {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<WheelEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel backed event source for headless runs and tests
pub struct TestEventSource {
    rx: Receiver<WheelEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<WheelEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<WheelEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the game one event at a time on the calling thread
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to one tick interval and returns the next event, Tick on
    /// timeout or Closed once the source has disconnected
    pub fn step(&self) -> WheelEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => WheelEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => WheelEvent::Closed,
        }
    }

    /// Feeds events to `handler` until it breaks, the source closes or
    /// `max_steps` is reached. Returns the number of steps taken.
    pub fn run<F>(&self, max_steps: usize, mut handler: F) -> usize
    where
        F: FnMut(WheelEvent) -> ControlFlow<()>,
    {
        for taken in 1..=max_steps {
            let ev = self.step();
            let closed = matches!(ev, WheelEvent::Closed);
            if handler(ev).is_break() || closed {
                return taken;
            }
        }
        max_steps
    }
}
