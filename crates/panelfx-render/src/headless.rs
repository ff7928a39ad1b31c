#![forbid(unsafe_code)]

//! In-memory sink for tests and headless runs.
//!
//! [`HeadlessSink`] keeps a staging buffer and a copy of the last committed
//! frame so tests can assert on exactly what the panel would show.

use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::sink::{DisplaySink, SinkError};

/// A [`DisplaySink`] that records frames instead of lighting LEDs.
#[derive(Debug, Clone)]
pub struct HeadlessSink {
    staging: PixelBuffer,
    last_frame: PixelBuffer,
    brightness: u8,
    commits: u64,
    fail_commits: bool,
}

impl HeadlessSink {
    /// Create a sink for a `width x height` panel.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            staging: PixelBuffer::new(width, height),
            last_frame: PixelBuffer::new(width, height),
            brightness: PixelBuffer::DEFAULT_BRIGHTNESS,
            commits: 0,
            fail_commits: false,
        }
    }

    /// The most recently committed frame.
    pub fn last_frame(&self) -> &PixelBuffer {
        &self.last_frame
    }

    /// Number of successful commits so far.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Brightness most recently set.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Make every subsequent commit fail with [`SinkError::Disconnected`].
    pub fn fail_commits(&mut self, fail: bool) {
        self.fail_commits = fail;
    }
}

impl DisplaySink for HeadlessSink {
    fn width(&self) -> u16 {
        self.staging.width()
    }

    fn height(&self) -> u16 {
        self.staging.height()
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Rgb) {
        self.staging.set_pixel(x as i32, y as i32, color);
    }

    fn clear(&mut self) {
        self.staging.clear();
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness.min(100);
        self.staging.set_brightness(self.brightness);
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        if self.fail_commits {
            return Err(SinkError::Disconnected("headless sink set to fail".into()));
        }
        self.last_frame.clone_from(&self.staging);
        self.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_pixels_invisible_until_commit() {
        let mut sink = HeadlessSink::new(4, 4);
        sink.set_pixel(1, 1, Rgb::RED);
        assert!(sink.last_frame().is_cleared());
        sink.commit().unwrap();
        assert_eq!(sink.last_frame().get(1, 1), Some(Rgb::RED));
        assert_eq!(sink.commits(), 1);
    }

    #[test]
    fn present_copies_buffer_and_brightness() {
        let mut sink = HeadlessSink::new(3, 3);
        let mut buf = PixelBuffer::new(3, 3);
        buf.set_brightness(42);
        buf.set_pixel(2, 0, Rgb::BLUE);
        sink.present(&buf).unwrap();
        assert_eq!(sink.brightness(), 42);
        assert_eq!(sink.last_frame().get(2, 0), Some(Rgb::BLUE));
        assert_eq!(sink.last_frame().lit_pixels(), 1);
    }

    #[test]
    fn present_replaces_previous_frame() {
        let mut sink = HeadlessSink::new(2, 2);
        let mut buf = PixelBuffer::new(2, 2);
        buf.fill(Rgb::WHITE);
        sink.present(&buf).unwrap();
        buf.clear();
        sink.present(&buf).unwrap();
        assert!(sink.last_frame().is_cleared());
    }

    #[test]
    fn failing_commit_keeps_last_frame() {
        let mut sink = HeadlessSink::new(2, 2);
        sink.set_pixel(0, 0, Rgb::GREEN);
        sink.commit().unwrap();
        sink.fail_commits(true);
        sink.clear();
        assert!(sink.commit().is_err());
        assert_eq!(sink.last_frame().get(0, 0), Some(Rgb::GREEN));
        assert_eq!(sink.commits(), 1);
    }
}
