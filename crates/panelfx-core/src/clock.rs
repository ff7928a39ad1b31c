#![forbid(unsafe_code)]

//! Wall-clock time source for the Clock mode.
//!
//! The engine never reads the system clock directly; it asks a
//! [`WallClock`], so tests can pin the time with [`FixedClock`].

use std::sync::Mutex;

use web_time::{SystemTime, UNIX_EPOCH};

use crate::options::ClockFormat;

const SECS_PER_DAY: i64 = 86_400;

/// Time of day on the panel's local clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LocalTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl LocalTime {
    /// Build a time, wrapping out-of-range components.
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour: hour % 24,
            minute: minute % 60,
            second: second % 60,
        }
    }

    /// Local time for a Unix timestamp shifted by `utc_offset_minutes`.
    pub fn from_unix_secs(secs: i64, utc_offset_minutes: i32) -> Self {
        let local = secs + i64::from(utc_offset_minutes) * 60;
        let of_day = local.rem_euclid(SECS_PER_DAY);
        Self {
            hour: (of_day / 3600) as u8,
            minute: ((of_day % 3600) / 60) as u8,
            second: (of_day % 60) as u8,
        }
    }

    /// Render as `hh:mm:ss AM` or `HH:MM:SS`.
    pub fn format(&self, format: ClockFormat) -> String {
        match format {
            ClockFormat::TwentyFourHour => {
                format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
            }
            ClockFormat::TwelveHour => {
                let suffix = if self.hour < 12 { "AM" } else { "PM" };
                let h = match self.hour % 12 {
                    0 => 12,
                    h => h,
                };
                format!("{h:02}:{:02}:{:02} {suffix}", self.minute, self.second)
            }
        }
    }
}

/// Source of the current local time.
pub trait WallClock: Send + Sync {
    fn now(&self) -> LocalTime;
}

/// The host clock shifted by a fixed UTC offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    utc_offset_minutes: i32,
}

impl SystemClock {
    pub fn new(utc_offset_minutes: i32) -> Self {
        Self { utc_offset_minutes }
    }
}

impl WallClock for SystemClock {
    fn now(&self) -> LocalTime {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        LocalTime::from_unix_secs(secs, self.utc_offset_minutes)
    }
}

/// A clock that reports whatever time it was last set to.
#[derive(Debug, Default)]
pub struct FixedClock {
    time: Mutex<LocalTime>,
}

impl FixedClock {
    pub fn new(time: LocalTime) -> Self {
        Self {
            time: Mutex::new(time),
        }
    }

    pub fn set(&self, time: LocalTime) {
        let mut guard = self.time.lock().unwrap_or_else(|e| e.into_inner());
        *guard = time;
    }
}

impl WallClock for FixedClock {
    fn now(&self) -> LocalTime {
        *self.time.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_hour_format() {
        assert_eq!(LocalTime::new(0, 5, 9).format(ClockFormat::TwelveHour), "12:05:09 AM");
        assert_eq!(LocalTime::new(12, 0, 0).format(ClockFormat::TwelveHour), "12:00:00 PM");
        assert_eq!(LocalTime::new(23, 59, 59).format(ClockFormat::TwelveHour), "11:59:59 PM");
        assert_eq!(LocalTime::new(9, 30, 0).format(ClockFormat::TwelveHour), "09:30:00 AM");
    }

    #[test]
    fn twenty_four_hour_format() {
        assert_eq!(
            LocalTime::new(7, 3, 2).format(ClockFormat::TwentyFourHour),
            "07:03:02"
        );
    }

    #[test]
    fn unix_seconds_with_offset() {
        // 1970-01-01 00:00:00 UTC
        assert_eq!(LocalTime::from_unix_secs(0, 0), LocalTime::new(0, 0, 0));
        assert_eq!(LocalTime::from_unix_secs(0, -300), LocalTime::new(19, 0, 0));
        assert_eq!(LocalTime::from_unix_secs(3_661, 30), LocalTime::new(1, 31, 1));
    }

    #[test]
    fn fixed_clock_can_be_moved() {
        let clock = FixedClock::new(LocalTime::new(1, 2, 3));
        assert_eq!(clock.now(), LocalTime::new(1, 2, 3));
        clock.set(LocalTime::new(4, 5, 6));
        assert_eq!(clock.now(), LocalTime::new(4, 5, 6));
    }

    #[test]
    fn system_clock_is_in_range() {
        let t = SystemClock::new(0).now();
        assert!(t.hour < 24 && t.minute < 60 && t.second < 60);
    }
}
