//! Long-running-operation progress indicator.
//!
//! The indicator owns a [`ProgressState`] and at most one periodic ticker
//! task. While active, the ticker re-renders `"<message> (<elapsed>)"` once
//! per second into a [`ProgressSink`].

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::format::elapsed_text;

/// Advisory appended once an operation runs past the soft timeout.
pub const SOFT_TIMEOUT_MESSAGE: &str =
    "La operación está tardando más de lo esperado pero sigue en proceso. Por favor, espere...";

/// Default soft timeout (five minutes).
pub const DEFAULT_SOFT_TIMEOUT: Duration = Duration::from_secs(300);

const TICK: Duration = Duration::from_secs(1);

/// Destination of rendered progress text.
pub trait ProgressSink: Send + Sync {
    /// Replaces the displayed text.
    fn show(&self, text: &str);

    /// Removes any displayed text.
    fn clear(&self);
}

/// State of one active indicator run.
#[derive(Debug, Clone)]
pub struct ProgressState {
    message: String,
    started_at: Instant,
}

impl ProgressState {
    fn new(message: String) -> Self {
        Self {
            message,
            started_at: Instant::now(),
        }
    }

    /// Current prefix message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whole seconds since `start`.
    pub fn elapsed_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    fn render(&self, soft_timeout: Option<Duration>) -> String {
        let elapsed = self.elapsed_secs();
        let line = format!("{} ({})", self.message, elapsed_text(elapsed));
        match soft_timeout {
            Some(limit) if elapsed >= limit.as_secs() => format!("{line} {SOFT_TIMEOUT_MESSAGE}"),
            _ => line,
        }
    }
}

/// Progress indicator with a scoped periodic re-render.
pub struct ProgressIndicator {
    sink: Arc<dyn ProgressSink>,
    state: Arc<Mutex<Option<ProgressState>>>,
    ticker: Option<JoinHandle<()>>,
    soft_timeout: Option<Duration>,
}

impl ProgressIndicator {
    /// Creates an idle indicator with the default soft timeout.
    pub fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            sink,
            state: Arc::new(Mutex::new(None)),
            ticker: None,
            soft_timeout: Some(DEFAULT_SOFT_TIMEOUT),
        }
    }

    /// Overrides the soft timeout; `None` disables the advisory.
    pub fn with_soft_timeout(mut self, soft_timeout: Option<Duration>) -> Self {
        self.soft_timeout = soft_timeout;
        self
    }

    /// Starts (or restarts) the indicator.
    ///
    /// A running ticker is cancelled first and the elapsed counter resets, so
    /// at most one periodic re-render exists. Must be called inside a tokio
    /// runtime.
    pub fn start(&mut self, message: impl Into<String>) {
        self.cancel_ticker();

        let state = ProgressState::new(message.into());
        self.sink.show(state.message());
        if let Ok(mut slot) = self.state.lock() {
            *slot = Some(state);
        }

        let shared = Arc::clone(&self.state);
        let sink = Arc::clone(&self.sink);
        let soft_timeout = self.soft_timeout;
        self.ticker = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK, TICK);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let line = match shared.lock() {
                    Ok(slot) => slot.as_ref().map(|state| state.render(soft_timeout)),
                    Err(_) => None,
                };
                match line {
                    Some(line) => sink.show(&line),
                    None => break,
                }
            }
        }));
    }

    /// Replaces the prefix message, keeping the elapsed counter.
    ///
    /// Ignored while idle.
    pub fn update(&mut self, message: impl Into<String>) {
        let line = match self.state.lock() {
            Ok(mut slot) => slot.as_mut().map(|state| {
                state.message = message.into();
                state.render(self.soft_timeout)
            }),
            Err(_) => None,
        };

        if let Some(line) = line {
            self.sink.show(&line);
        }
    }

    /// Cancels the periodic re-render and clears the displayed text.
    pub fn stop(&mut self) {
        self.cancel_ticker();
        if let Ok(mut slot) = self.state.lock() {
            *slot = None;
        }
        self.sink.clear();
    }

    /// Returns `true` while a run is active.
    pub fn is_active(&self) -> bool {
        self.ticker.is_some()
    }

    /// Snapshot of the active state, if any.
    pub fn state(&self) -> Option<ProgressState> {
        self.state.lock().ok().and_then(|slot| slot.clone())
    }

    /// Starts the indicator and returns a guard that stops it when dropped.
    pub fn begin(&mut self, message: impl Into<String>) -> ActiveProgress<'_> {
        self.start(message);
        ActiveProgress { indicator: self }
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

/// Scope guard for one indicator run; stops the indicator on every exit path.
pub struct ActiveProgress<'a> {
    indicator: &'a mut ProgressIndicator,
}

impl ActiveProgress<'_> {
    /// Replaces the prefix message of the running indicator.
    pub fn update(&mut self, message: impl Into<String>) {
        self.indicator.update(message);
    }
}

impl Drop for ActiveProgress<'_> {
    fn drop(&mut self) {
        self.indicator.stop();
    }
}

/// Sink that rewrites one stderr line.
#[derive(Debug, Default)]
pub struct TerminalProgress;

impl ProgressSink for TerminalProgress {
    fn show(&self, text: &str) {
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "\r\x1b[2K{text}");
        let _ = err.flush();
    }

    fn clear(&self) {
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "\r\x1b[2K");
        let _ = err.flush();
    }
}
