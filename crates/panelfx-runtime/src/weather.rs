#![forbid(unsafe_code)]

//! Weather report cache.
//!
//! Reports are fetched off the tick thread and refreshed at most once per
//! refresh interval. A failed refresh keeps the previous report.

use std::sync::Arc;
use std::time::Duration;

use panelfx_core::{WeatherProvider, WeatherReport, WeatherStatus};

use crate::fetch::{Fetched, Fetcher};

pub struct WeatherCache {
    provider: Arc<dyn WeatherProvider>,
    refresh: Duration,
    fetcher: Fetcher<String, WeatherReport>,
}

impl WeatherCache {
    pub fn new(provider: Arc<dyn WeatherProvider>, refresh: Duration) -> Self {
        Self {
            provider,
            refresh,
            fetcher: Fetcher::new("weather"),
        }
    }

    /// Status for `location`, kicking off a fetch when one is due.
    pub fn status(&mut self, location: Option<&str>) -> WeatherStatus {
        let key = location.map(str::to_string);
        let provider = self.provider.clone();
        let fetched = self.fetcher.poll(key.as_ref(), Some(self.refresh), move |loc| {
            provider.fetch(loc)
        });
        match fetched {
            Fetched::Idle => WeatherStatus::Unconfigured,
            Fetched::Pending => WeatherStatus::Loading,
            Fetched::Ready(report) => WeatherStatus::Ready(report),
            Fetched::Failed => WeatherStatus::Failed,
        }
    }

    /// Wait for an in-flight fetch to finish.
    pub fn join(&mut self) {
        self.fetcher.join();
    }

    pub fn is_idle(&self) -> bool {
        self.fetcher.is_idle()
    }
}
