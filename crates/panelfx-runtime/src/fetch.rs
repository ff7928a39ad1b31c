#![forbid(unsafe_code)]

//! Keyed single-value cache filled by background threads.
//!
//! The tick thread calls [`Fetcher::poll`] with the key it currently wants.
//! A poll never blocks: it starts at most one job, then reports whatever is
//! cached. A job whose key is no longer wanted when it finishes is dropped.
//! A failed job leaves the previous value for the same key in place.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};
use web_time::Instant;

/// What a poll observed.
#[derive(Debug)]
pub(crate) enum Fetched<V> {
    /// No key wanted.
    Idle,
    /// Work in flight, nothing cached.
    Pending,
    Ready(Arc<V>),
    /// Last job failed, nothing cached.
    Failed,
}

struct Slot<K, V> {
    key: Option<K>,
    value: Option<Arc<V>>,
    in_flight: bool,
    failed: bool,
    started_at: Option<Instant>,
}

pub(crate) struct Fetcher<K, V> {
    label: &'static str,
    slot: Arc<Mutex<Slot<K, V>>>,
    job: Option<thread::JoinHandle<()>>,
}

fn lock<K, V>(slot: &Mutex<Slot<K, V>>) -> MutexGuard<'_, Slot<K, V>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K, V> Fetcher<K, V>
where
    K: Clone + PartialEq + fmt::Debug + Send + 'static,
    V: Send + Sync + 'static,
{
    pub(crate) fn new(label: &'static str) -> Self {
        Self {
            label,
            slot: Arc::new(Mutex::new(Slot {
                key: None,
                value: None,
                in_flight: false,
                failed: false,
                started_at: None,
            })),
            job: None,
        }
    }

    /// Report the cached state for `key`, starting `work` if the key changed
    /// or the cached value is older than `max_age`.
    pub(crate) fn poll<F, E>(
        &mut self,
        key: Option<&K>,
        max_age: Option<Duration>,
        work: F,
    ) -> Fetched<V>
    where
        F: FnOnce(&K) -> Result<V, E> + Send + 'static,
        E: fmt::Display,
    {
        let Some(key) = key else {
            let mut slot = lock(&self.slot);
            slot.key = None;
            slot.value = None;
            slot.failed = false;
            return Fetched::Idle;
        };

        let start = {
            let mut slot = lock(&self.slot);
            if slot.key.as_ref() != Some(key) {
                debug!(label = self.label, ?key, "cache key changed");
                slot.key = Some(key.clone());
                slot.value = None;
                slot.failed = false;
                slot.started_at = None;
            }
            let stale = match (slot.started_at, max_age) {
                (None, _) => true,
                (Some(at), Some(age)) => at.elapsed() >= age,
                (Some(_), None) => false,
            };
            let start = stale && !slot.in_flight;
            if start {
                slot.in_flight = true;
                slot.started_at = Some(Instant::now());
            }
            start
        };

        if start {
            self.spawn(key.clone(), work);
        }

        let slot = lock(&self.slot);
        match (&slot.value, slot.in_flight, slot.failed) {
            (Some(value), _, _) => Fetched::Ready(value.clone()),
            (None, true, _) => Fetched::Pending,
            (None, false, true) => Fetched::Failed,
            (None, false, false) => Fetched::Pending,
        }
    }

    fn spawn<F, E>(&mut self, key: K, work: F)
    where
        F: FnOnce(&K) -> Result<V, E> + Send + 'static,
        E: fmt::Display,
    {
        let slot = self.slot.clone();
        let label = self.label;
        let spawned = thread::Builder::new()
            .name(format!("panelfx-{label}"))
            .spawn(move || {
                let result = work(&key);
                let mut slot = lock(&slot);
                slot.in_flight = false;
                if slot.key.as_ref() != Some(&key) {
                    debug!(label, ?key, "discarding result for stale key");
                    return;
                }
                match result {
                    Ok(value) => {
                        debug!(label, ?key, "background fetch complete");
                        slot.value = Some(Arc::new(value));
                        slot.failed = false;
                    }
                    Err(err) => {
                        warn!(label, ?key, error = %err, "background fetch failed");
                        slot.failed = true;
                    }
                }
            });
        match spawned {
            Ok(handle) => self.job = Some(handle),
            Err(err) => {
                warn!(label, error = %err, "cannot spawn fetch thread");
                let mut slot = lock(&self.slot);
                slot.in_flight = false;
                slot.failed = true;
            }
        }
    }

    /// Block until the most recent job, if any, has finished.
    pub(crate) fn join(&mut self) {
        if let Some(handle) = self.job.take() {
            let _ = handle.join();
        }
    }

    pub(crate) fn is_idle(&self) -> bool {
        !lock(&self.slot).in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(n: u32) -> impl FnOnce(&String) -> Result<u32, String> + Send + 'static {
        move |_| Ok(n)
    }

    fn fail() -> impl FnOnce(&String) -> Result<u32, String> + Send + 'static {
        |key| Err(format!("no data for {key}"))
    }

    #[test]
    fn no_key_is_idle() {
        let mut f: Fetcher<String, u32> = Fetcher::new("test");
        assert!(matches!(f.poll(None, None, ok(1)), Fetched::Idle));
    }

    #[test]
    fn first_poll_pends_then_ready() {
        let mut f = Fetcher::new("test");
        let key = "a".to_string();
        // The job may already have landed by the time the poll reads back.
        assert!(matches!(
            f.poll(Some(&key), None, ok(5)),
            Fetched::Pending | Fetched::Ready(_)
        ));
        f.join();
        match f.poll(Some(&key), None, ok(6)) {
            Fetched::Ready(v) => assert_eq!(*v, 5),
            other => panic!("expected ready, got {other:?}"),
        }
    }

    #[test]
    fn failure_without_value_reports_failed() {
        let mut f = Fetcher::new("test");
        let key = "a".to_string();
        f.poll(Some(&key), None, fail());
        f.join();
        assert!(matches!(f.poll(Some(&key), None, ok(1)), Fetched::Failed));
    }

    #[test]
    fn failed_refresh_keeps_prior_value() {
        let mut f = Fetcher::new("test");
        let key = "a".to_string();
        f.poll(Some(&key), Some(Duration::ZERO), ok(9));
        f.join();
        // Stale immediately: this poll starts a failing refresh.
        f.poll(Some(&key), Some(Duration::ZERO), fail());
        f.join();
        match f.poll(Some(&key), Some(Duration::from_secs(3600)), ok(0)) {
            Fetched::Ready(v) => assert_eq!(*v, 9),
            other => panic!("expected ready, got {other:?}"),
        }
    }

    #[test]
    fn key_change_drops_value() {
        let mut f = Fetcher::new("test");
        let a = "a".to_string();
        let b = "b".to_string();
        f.poll(Some(&a), None, ok(1));
        f.join();
        assert!(matches!(
            f.poll(Some(&b), None, fail()),
            Fetched::Pending | Fetched::Failed
        ));
        f.join();
        assert!(matches!(f.poll(Some(&b), None, ok(2)), Fetched::Failed));
    }

    #[test]
    fn fresh_value_is_not_refetched() {
        let mut f = Fetcher::new("test");
        let key = "a".to_string();
        f.poll(Some(&key), None, ok(1));
        f.join();
        f.poll(Some(&key), None, ok(2));
        assert!(f.is_idle());
        match f.poll(Some(&key), None, ok(3)) {
            Fetched::Ready(v) => assert_eq!(*v, 1),
            other => panic!("expected ready, got {other:?}"),
        }
    }
}
