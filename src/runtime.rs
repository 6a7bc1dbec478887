use std::cell::Cell;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Unified event type consumed by the play loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A line typed by the player, without the trailing newline
    Line(String),
    /// Input is closed; nothing more will arrive
    Closed,
    Tick,
}

/// Source of player input
pub trait GameEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Production event source reading lines from stdin on a helper thread
pub struct StdinEventSource {
    rx: Receiver<GameEvent>,
}

impl StdinEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(GameEvent::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = tx.send(GameEvent::Closed);
        });

        Self { rx }
    }
}

impl Default for StdinEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for StdinEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// The once-per-second countdown tick
    pub fn seconds() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the game one event/tick at a time.
///
/// Ticks keep a steady cadence: input arriving mid-interval does not push the
/// next tick back.
pub struct Runner<E: GameEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Cell<Instant>,
}

impl<E: GameEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Cell::new(Instant::now() + ticker.interval());
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Blocks until the next tick is due and returns the next event, or Tick once it is due
    pub fn step(&self) -> GameEvent {
        let now = Instant::now();
        let due = self.next_tick.get();
        if now >= due {
            return self.tick(due);
        }

        match self.event_source.recv_timeout(due - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => self.tick(due),
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(due.saturating_duration_since(Instant::now()));
                self.tick(due)
            }
        }
    }

    fn tick(&self, due: Instant) -> GameEvent {
        self.next_tick.set(due + self.ticker.interval());
        GameEvent::Tick
    }
}
