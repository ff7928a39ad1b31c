#![forbid(unsafe_code)]

//! Output sink contract.
//!
//! A [`DisplaySink`] is whatever finally shows a frame: the LED matrix
//! driver on the device, a terminal preview, or the in-memory
//! [`HeadlessSink`](crate::headless::HeadlessSink) used by tests. The engine
//! only talks to this trait.

use std::fmt;

use crate::buffer::PixelBuffer;
use crate::color::Rgb;

/// Errors raised while materializing a frame.
#[derive(Debug)]
pub enum SinkError {
    /// I/O error while writing the frame out.
    Io(std::io::Error),
    /// The device went away.
    Disconnected(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Io(e) => write!(f, "I/O error: {e}"),
            SinkError::Disconnected(msg) => write!(f, "sink disconnected: {msg}"),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::Io(e) => Some(e),
            SinkError::Disconnected(_) => None,
        }
    }
}

impl From<std::io::Error> for SinkError {
    fn from(e: std::io::Error) -> Self {
        SinkError::Io(e)
    }
}

/// The narrow hardware interface the engine renders through.
///
/// Pixel writes and `clear` stage a frame; nothing is visible until
/// [`commit`](DisplaySink::commit) returns.
pub trait DisplaySink: Send {
    /// Panel width in pixels.
    fn width(&self) -> u16;

    /// Panel height in pixels.
    fn height(&self) -> u16;

    /// Stage one pixel. Out-of-range coordinates are ignored.
    fn set_pixel(&mut self, x: u16, y: u16, color: Rgb);

    /// Stage an all-black frame.
    fn clear(&mut self);

    /// Set the panel brightness (`0..=100`).
    fn set_brightness(&mut self, brightness: u8);

    /// Make the staged frame visible.
    fn commit(&mut self) -> Result<(), SinkError>;

    /// Stage `buffer` in full, forward its brightness, and commit.
    fn present(&mut self, buffer: &PixelBuffer) -> Result<(), SinkError> {
        self.set_brightness(buffer.brightness());
        self.clear();
        for (x, y, color) in buffer.iter() {
            if !color.is_black() {
                self.set_pixel(x, y, color);
            }
        }
        self.commit()
    }

    /// Clear the panel and commit the blank frame.
    fn blank(&mut self) -> Result<(), SinkError> {
        self.clear();
        self.commit()
    }
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn width(&self) -> u16 {
        (**self).width()
    }

    fn height(&self) -> u16 {
        (**self).height()
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Rgb) {
        (**self).set_pixel(x, y, color);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn set_brightness(&mut self, brightness: u8) {
        (**self).set_brightness(brightness);
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        (**self).commit()
    }

    fn present(&mut self, buffer: &PixelBuffer) -> Result<(), SinkError> {
        (**self).present(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn io_error_converts_and_chains() {
        let err: SinkError = std::io::Error::other("pipe closed").into();
        assert!(err.to_string().contains("pipe closed"));
        assert!(err.source().is_some());
    }

    #[test]
    fn disconnected_has_no_source() {
        let err = SinkError::Disconnected("usb".into());
        assert_eq!(err.to_string(), "sink disconnected: usb");
        assert!(err.source().is_none());
    }
}
