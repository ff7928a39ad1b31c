#![forbid(unsafe_code)]

//! Weather data contract.
//!
//! Fetching happens outside the tick on a background thread (see the
//! runtime's weather cache). Generators only ever see a [`WeatherStatus`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Coarse sky condition, used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    #[default]
    Clear,
    Clouds,
    Rain,
    Snow,
    Storm,
    Fog,
}

/// One day of the forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Short day label (`MON`, `TUE`, ...).
    pub day: String,
    /// High temperature in degrees.
    pub high: i16,
    pub condition: WeatherCondition,
}

/// Current conditions plus a five-day forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    /// Current temperature in degrees.
    pub temperature: i16,
    pub condition: WeatherCondition,
    /// Relative humidity percent.
    pub humidity: u8,
    pub forecast: Vec<ForecastDay>,
}

impl WeatherReport {
    /// Number of forecast days shown on the panel.
    pub const FORECAST_DAYS: usize = 5;
}

/// Errors from a weather provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    /// The location is unknown to the provider.
    NotFound(String),
    /// Transport failure.
    Network(String),
    /// The provider answered with something unreadable.
    Malformed(String),
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::NotFound(loc) => write!(f, "no weather for location {loc:?}"),
            WeatherError::Network(msg) => write!(f, "weather network error: {msg}"),
            WeatherError::Malformed(msg) => write!(f, "malformed weather response: {msg}"),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        WeatherError::Malformed(e.to_string())
    }
}

/// Blocking weather lookup, called off the tick thread.
pub trait WeatherProvider: Send + Sync {
    fn fetch(&self, location: &str) -> Result<WeatherReport, WeatherError>;
}

/// A provider backed by an in-memory table of reports.
#[derive(Debug, Clone, Default)]
pub struct StaticWeatherProvider {
    reports: HashMap<String, WeatherReport>,
    fallback: Option<WeatherReport>,
}

impl StaticWeatherProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `report` for `location`.
    #[must_use]
    pub fn with_report(mut self, location: impl Into<String>, report: WeatherReport) -> Self {
        self.reports.insert(location.into(), report);
        self
    }

    /// Serve `report` for any location not in the table, relabeled with the
    /// requested location.
    #[must_use]
    pub fn with_fallback(mut self, report: WeatherReport) -> Self {
        self.fallback = Some(report);
        self
    }

    /// Load a table of reports from JSON (`{ "location": report, ... }`).
    pub fn from_json(json: &str) -> Result<Self, WeatherError> {
        let reports: HashMap<String, WeatherReport> = serde_json::from_str(json)?;
        Ok(Self {
            reports,
            fallback: None,
        })
    }

    /// A plausible sunny report, used by the preview binary.
    pub fn sample_report(location: &str) -> WeatherReport {
        const DAYS: [(&str, i16, WeatherCondition); 5] = [
            ("MON", 74, WeatherCondition::Clear),
            ("TUE", 71, WeatherCondition::Clouds),
            ("WED", 65, WeatherCondition::Rain),
            ("THU", 68, WeatherCondition::Clouds),
            ("FRI", 77, WeatherCondition::Clear),
        ];
        WeatherReport {
            location: location.to_string(),
            temperature: 72,
            condition: WeatherCondition::Clear,
            humidity: 40,
            forecast: DAYS
                .iter()
                .map(|&(day, high, condition)| ForecastDay {
                    day: day.to_string(),
                    high,
                    condition,
                })
                .collect(),
        }
    }
}

impl WeatherProvider for StaticWeatherProvider {
    fn fetch(&self, location: &str) -> Result<WeatherReport, WeatherError> {
        if let Some(report) = self.reports.get(location) {
            return Ok(report.clone());
        }
        match &self.fallback {
            Some(report) => Ok(WeatherReport {
                location: location.to_string(),
                ..report.clone()
            }),
            None => Err(WeatherError::NotFound(location.to_string())),
        }
    }
}

/// What the Weather mode can show right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WeatherStatus {
    /// No location set.
    #[default]
    Unconfigured,
    /// A fetch is in flight and nothing is cached yet.
    Loading,
    /// A report is available (possibly stale while a refresh runs).
    Ready(Arc<WeatherReport>),
    /// The last fetch failed and nothing is cached.
    Failed,
}

impl WeatherStatus {
    /// The cached report, if any.
    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            WeatherStatus::Ready(report) => Some(report.as_ref()),
            _ => None,
        }
    }

    /// Placeholder text for states without a report.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            WeatherStatus::Unconfigured => Some("SET ZIP"),
            WeatherStatus::Loading => Some("LOADING"),
            WeatherStatus::Failed => Some("NO DATA"),
            WeatherStatus::Ready(_) => None,
        }
    }
}
