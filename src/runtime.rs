use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the console loop
#[derive(Clone, Debug)]
pub enum ConsoleEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait ConsoleEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<ConsoleEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<ConsoleEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                // Windows reports both press and release; only presses drive the console
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(ConsoleEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(ConsoleEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("terminal event reader stopped: {}", e);
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

impl ConsoleEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ConsoleEvent, RecvTimeoutError> {
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
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<ConsoleEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<ConsoleEvent>) -> Self {
        Self { rx }
    }
}

impl ConsoleEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ConsoleEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the console one event/tick at a time
pub struct Runner<E: ConsoleEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: ConsoleEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> ConsoleEvent {
        self.step_within(None)
    }

    /// Like [`Runner::step`], but wakes early when `due` is sooner than the
    /// tick interval.
    pub fn step_within(&self, due: Option<Duration>) -> ConsoleEvent {
        let interval = self.ticker.interval();
        let timeout = due.map_or(interval, |d| d.min(interval));
        match self.event_source.recv_timeout(timeout) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                ConsoleEvent::Tick
            }
        }
    }
}

/// A cancellable repeating deadline.
///
/// The console polls schedules from the UI thread; nothing fires on its own.
/// `poll` reports every whole period that elapsed since the last due time, so
/// a poll that arrives late (a burst of key events, a slow frame) catches up
/// rather than dropping ticks.
#[derive(Debug, Clone)]
pub struct Schedule {
    period: Duration,
    next_due: Option<Instant>,
}

impl Schedule {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Arm the schedule; the first fire is one period after `now`.
    /// Re-arming an active schedule restarts its phase.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left until the next fire, if armed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Number of fires due at `now`; advances the deadline past `now`.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut fired = 0;
        while due <= now {
            fired += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        fired
    }
}
