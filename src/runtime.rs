use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum DojoEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait DojoEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<DojoEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<DojoEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => DojoEvent::Key(key),
                Ok(CtEvent::Mouse(mouse)) => DojoEvent::Mouse(mouse),
                Ok(CtEvent::Resize(w, h)) => DojoEvent::Resize(w, h),
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!("terminal event stream closed: {e}");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
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

impl DojoEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DojoEvent, RecvTimeoutError> {
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
    rx: Receiver<DojoEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<DojoEvent>) -> Self {
        Self { rx }
    }
}

impl DojoEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DojoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: DojoEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: DojoEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> DojoEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => DojoEvent::Tick,
        }
    }
}

/// Handle to a scheduled task, used to cancel it and to recognise stale
/// deliveries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    handle: TaskHandle,
    due: Duration,
    every: Option<Duration>,
    task: T,
}

/// Virtual-clock task queue.
///
/// Nothing runs on its own: the owner moves the clock forward and receives the
/// tasks that fell due, in due order (ties in scheduling order).
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule_once(&mut self, delay: Duration, task: T) -> TaskHandle {
        self.push(delay, None, task)
    }

    /// First delivery after one `interval`, then every `interval`
    pub fn schedule_repeating(&mut self, interval: Duration, task: T) -> TaskHandle {
        let interval = interval.max(Duration::from_millis(1));
        self.push(interval, Some(interval), task)
    }

    /// Returns `false` if the handle was not scheduled (already fired or cancelled)
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        before != self.entries.len()
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Pop the earliest task due at or before `deadline`, moving the clock to
    /// its due time. Repeating tasks are rescheduled.
    pub fn next_due(&mut self, deadline: Duration) -> Option<(TaskHandle, T)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= deadline)
            .min_by_key(|(_, e)| (e.due, e.handle))
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[idx];
        self.now = self.now.max(entry.due);
        let fired = (entry.handle, entry.task.clone());

        match entry.every {
            Some(every) => entry.due += every,
            None => {
                self.entries.swap_remove(idx);
            }
        }
        Some(fired)
    }

    /// Move the clock to `deadline` once everything due has been taken
    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    /// Move the clock forward and collect everything that fell due
    pub fn advance(&mut self, elapsed: Duration) -> Vec<(TaskHandle, T)> {
        let deadline = self.now + elapsed;
        let mut fired = Vec::new();
        while let Some(due) = self.next_due(deadline) {
            fired.push(due);
        }
        self.settle(deadline);
        fired
    }

    fn push(&mut self, delay: Duration, every: Option<Duration>, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            due: self.now + delay,
            every,
            task,
        });
        handle
    }
}
