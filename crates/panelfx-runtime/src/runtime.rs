#![forbid(unsafe_code)]

//! Lifecycle around an [`Engine`]: start, stop, shutdown.
//!
//! The engine lives behind a mutex shared with the tick thread. At most one
//! tick loop runs at a time: starting again replaces the running loop, and
//! stopping joins the thread before blanking the panel, so no tick can land
//! after the blank frame.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use panelfx_core::EngineConfig;
use panelfx_render::DisplaySink;
use tracing::{debug, info, warn};

use crate::control::ControlHandle;
use crate::engine::{Engine, EngineStatus};
use crate::scheduler::{IntervalTicker, Scheduler, Ticker};

/// Errors from [`Runtime::start`].
#[derive(Debug)]
pub enum RuntimeError {
    /// [`Runtime::shutdown`] was already called.
    ShutDown,
    /// The tick thread could not be spawned.
    Spawn(std::io::Error),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::ShutDown => write!(f, "runtime has been shut down"),
            RuntimeError::Spawn(e) => write!(f, "cannot spawn tick thread: {e}"),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::ShutDown => None,
            RuntimeError::Spawn(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(e: std::io::Error) -> Self {
        RuntimeError::Spawn(e)
    }
}

fn lock<S: DisplaySink>(engine: &Mutex<Engine<S>>) -> MutexGuard<'_, Engine<S>> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns an engine and its tick loop.
pub struct Runtime<S: DisplaySink + 'static> {
    engine: Arc<Mutex<Engine<S>>>,
    control: ControlHandle,
    interval: Duration,
    scheduler: Option<Scheduler>,
    shut_down: bool,
}

impl<S: DisplaySink + 'static> Runtime<S> {
    /// Wrap `engine`, ticking every `interval` once started.
    pub fn new(engine: Engine<S>, interval: Duration) -> Self {
        Self {
            control: engine.control(),
            engine: Arc::new(Mutex::new(engine)),
            interval,
            scheduler: None,
            shut_down: false,
        }
    }

    /// Build the engine from `config` and use its tick interval.
    pub fn from_config(config: &EngineConfig, sink: S) -> Self {
        Self::new(Engine::new(config, sink), config.tick_interval())
    }

    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    /// Start ticking at the configured interval.
    pub fn start(&mut self) -> Result<(), RuntimeError> {
        self.start_with(Box::new(IntervalTicker::new(self.interval)))
    }

    /// Start ticking under `ticker`. A running loop is stopped first.
    pub fn start_with(&mut self, ticker: Box<dyn Ticker>) -> Result<(), RuntimeError> {
        if self.shut_down {
            return Err(RuntimeError::ShutDown);
        }
        if let Some(running) = self.scheduler.take() {
            let ticks = running.stop();
            debug!(ticks, "replacing running tick loop");
        }
        let engine = self.engine.clone();
        let scheduler = Scheduler::spawn(ticker, move || {
            lock(&engine).tick();
        })?;
        self.scheduler = Some(scheduler);
        info!(interval_ms = self.interval.as_millis() as u64, "tick loop started");
        Ok(())
    }

    /// Stop ticking and blank the panel. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(running) = self.scheduler.take() {
            let ticks = running.stop();
            info!(ticks, "tick loop stopped");
        }
        if let Err(err) = lock(&self.engine).blank() {
            warn!(error = %err, "cannot blank sink");
        }
    }

    /// Block until a bounded ticker runs out. Returns the ticks run.
    ///
    /// Never returns for an [`IntervalTicker`] loop; use [`stop`](Self::stop).
    pub fn wait(&mut self) -> u64 {
        self.scheduler.take().map(Scheduler::join).unwrap_or(0)
    }

    /// Stop for good. Later starts fail with [`RuntimeError::ShutDown`].
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.stop();
        lock(&self.engine).join_background();
        self.shut_down = true;
        info!("runtime shut down");
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.as_ref().is_some_and(|s| !s.is_finished())
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn status(&self) -> EngineStatus {
        let mut status = lock(&self.engine).status();
        status.running = self.is_running();
        status
    }

    /// Run `f` with the engine locked (no tick runs meanwhile).
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut Engine<S>) -> R) -> R {
        f(&mut lock(&self.engine))
    }
}
