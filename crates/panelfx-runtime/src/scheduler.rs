#![forbid(unsafe_code)]

//! Tick scheduling.
//!
//! A [`Scheduler`] owns one background thread that calls a tick closure
//! whenever its [`Ticker`] says so. Ticks run sequentially on that thread
//! and never overlap. Stopping is cooperative: the [`StopSignal`] wakes the
//! ticker out of its wait, and [`Scheduler::stop`] joins the thread so an
//! in-progress tick always completes.

use std::io;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, trace};
use web_time::Instant;

/// Cooperative stop flag shared with the tick thread.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    /// Create a new stop signal pair (signal, trigger).
    pub fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: inner.clone(),
        };
        (signal, StopTrigger { inner })
    }

    /// Check if the stop signal has been triggered.
    pub fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for either the stop signal or a timeout.
    ///
    /// Returns `true` if stopped, `false` if timed out. Spurious wakeups are
    /// absorbed by re-waiting for the remainder.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if *stopped {
            return true;
        }

        let start = Instant::now();
        let mut remaining = duration;

        loop {
            let (guard, result) = cvar
                .wait_timeout(stopped, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            stopped = guard;
            if *stopped {
                return true;
            }
            if result.timed_out() {
                return false;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            remaining = duration - elapsed;
        }
    }
}

/// The owning side of a [`StopSignal`].
pub struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    /// Raise the flag and wake any waiter.
    pub fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        cvar.notify_all();
    }
}

/// Decides when the next tick happens.
pub trait Ticker: Send {
    /// Block until the next tick is due.
    ///
    /// Returns `false` when the loop should end, either because `stop`
    /// fired or because the ticker ran out.
    fn next_tick(&mut self, stop: &StopSignal) -> bool;
}

/// Wall-clock cadence with a fixed period.
///
/// The first tick fires immediately. When a tick overruns by one or more
/// whole periods the missed deadlines are dropped rather than replayed in
/// a burst.
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    interval: Duration,
    next: Option<Instant>,
    skipped: u64,
}

impl IntervalTicker {
    const MIN_INTERVAL: Duration = Duration::from_millis(1);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Self::MIN_INTERVAL),
            next: None,
            skipped: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Deadlines dropped so far because ticks ran late.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Pull `deadline` forward past any periods already missed at `now`.
    fn catch_up(&mut self, deadline: Instant, now: Instant) -> Instant {
        if now < deadline + self.interval {
            return deadline;
        }
        let behind = now.duration_since(deadline).as_nanos();
        let missed = (behind / self.interval.as_nanos()) as u32;
        self.skipped += u64::from(missed);
        trace!(missed, "skipping missed tick deadlines");
        deadline + self.interval * missed
    }
}

impl Ticker for IntervalTicker {
    fn next_tick(&mut self, stop: &StopSignal) -> bool {
        let now = Instant::now();
        let deadline = match self.next {
            Some(deadline) => self.catch_up(deadline, now),
            None => now,
        };
        if deadline > now {
            if stop.wait_timeout(deadline - now) {
                return false;
            }
        } else if stop.is_stopped() {
            return false;
        }
        self.next = Some(deadline + self.interval);
        true
    }
}

/// Fires a fixed number of ticks, then ends the loop.
#[derive(Debug, Clone)]
pub struct CountedTicker {
    remaining: u64,
    interval: Duration,
}

impl CountedTicker {
    /// `count` back-to-back ticks.
    pub fn new(count: u64) -> Self {
        Self {
            remaining: count,
            interval: Duration::ZERO,
        }
    }

    /// Wait `interval` before each tick.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Ticker for CountedTicker {
    fn next_tick(&mut self, stop: &StopSignal) -> bool {
        if self.remaining == 0 {
            return false;
        }
        let stopped = if self.interval.is_zero() {
            stop.is_stopped()
        } else {
            stop.wait_timeout(self.interval)
        };
        if stopped {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// A running tick loop.
pub struct Scheduler {
    trigger: StopTrigger,
    thread: Option<thread::JoinHandle<u64>>,
}

impl Scheduler {
    /// Spawn the tick thread. `on_tick` runs once per tick.
    pub fn spawn<F>(mut ticker: Box<dyn Ticker>, mut on_tick: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (signal, trigger) = StopSignal::new();
        let thread = thread::Builder::new()
            .name("panelfx-tick".into())
            .spawn(move || {
                let mut ticks = 0u64;
                while ticker.next_tick(&signal) {
                    on_tick();
                    ticks += 1;
                }
                debug!(ticks, "tick loop exited");
                ticks
            })?;
        Ok(Self {
            trigger,
            thread: Some(thread),
        })
    }

    /// Whether the loop has ended on its own (ticker ran out).
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Stop the loop and join the thread. Returns the number of ticks run.
    pub fn stop(self) -> u64 {
        self.trigger.stop();
        self.join()
    }

    /// Wait for the ticker to run out without signalling a stop.
    pub fn join(mut self) -> u64 {
        self.thread
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.trigger.stop();
        // Don't join in drop to avoid blocking
    }
}
