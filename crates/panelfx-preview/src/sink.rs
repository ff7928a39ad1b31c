#![forbid(unsafe_code)]

//! A [`DisplaySink`] that paints the panel into a terminal.
//!
//! Each terminal cell shows two panel rows with the upper half block: the
//! foreground is the top pixel, the background the bottom pixel. Brightness
//! is applied here, the way the LED driver would apply it.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{QueueableCommand, terminal};
use panelfx::{DisplaySink, Rgb, SinkError};

const HALF_BLOCK: &str = "\u{2580}";

pub struct TerminalSink<W: Write + Send> {
    out: W,
    width: u16,
    height: u16,
    staging: Vec<Rgb>,
    brightness: u8,
    origin: (u16, u16),
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r(),
        g: rgb.g(),
        b: rgb.b(),
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            width,
            height,
            staging: vec![Rgb::BLACK; usize::from(width) * usize::from(height)],
            brightness: 100,
            origin: (0, 0),
        }
    }

    /// Draw with the panel's top-left at terminal cell `(col, row)`.
    #[must_use]
    pub fn at(mut self, col: u16, row: u16) -> Self {
        self.origin = (col, row);
        self
    }

    fn pixel(&self, x: u16, y: u16) -> Rgb {
        if y >= self.height {
            return Rgb::BLACK;
        }
        self.staging[usize::from(y) * usize::from(self.width) + usize::from(x)]
            .scale(self.brightness)
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn write_frame(&mut self) -> io::Result<()> {
        let (col, row) = self.origin;
        for cell_row in 0..self.height.div_ceil(2) {
            self.out.queue(MoveTo(col, row + cell_row))?;
            for x in 0..self.width {
                let top = self.pixel(x, cell_row * 2);
                let bottom = self.pixel(x, cell_row * 2 + 1);
                self.out
                    .queue(SetForegroundColor(color(top)))?
                    .queue(SetBackgroundColor(color(bottom)))?
                    .queue(Print(HALF_BLOCK))?;
            }
            self.out.queue(ResetColor)?;
        }
        self.out.flush()
    }
}

impl TerminalSink<io::Stdout> {
    /// A sink on stdout, centered in the current terminal when it fits.
    pub fn stdout(width: u16, height: u16) -> Self {
        let sink = Self::new(io::stdout(), width, height);
        match terminal::size() {
            Ok((cols, rows)) => sink.at(
                cols.saturating_sub(width) / 2,
                rows.saturating_sub(height.div_ceil(2)) / 2,
            ),
            Err(_) => sink,
        }
    }
}

impl<W: Write + Send> DisplaySink for TerminalSink<W> {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Rgb) {
        if x < self.width && y < self.height {
            self.staging[usize::from(y) * usize::from(self.width) + usize::from(x)] = color;
        }
    }

    fn clear(&mut self) {
        self.staging.fill(Rgb::BLACK);
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness.min(100);
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        self.write_frame()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_writes_half_blocks() {
        let mut sink = TerminalSink::new(Vec::new(), 4, 4);
        sink.set_pixel(0, 0, Rgb::RED);
        sink.commit().unwrap();
        let text = String::from_utf8(sink.get_ref().clone()).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 8);
        assert!(text.contains("255;0;0"));
    }

    #[test]
    fn odd_height_pads_with_black() {
        let mut sink = TerminalSink::new(Vec::new(), 2, 3);
        sink.commit().unwrap();
        let text = String::from_utf8(sink.get_ref().clone()).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 4);
    }

    #[test]
    fn out_of_range_pixels_are_ignored() {
        let mut sink = TerminalSink::new(Vec::new(), 2, 2);
        sink.set_pixel(5, 5, Rgb::WHITE);
        assert!(sink.staging.iter().all(|c| c.is_black()));
    }

    #[test]
    fn brightness_scales_output() {
        let mut sink = TerminalSink::new(Vec::new(), 1, 1);
        sink.set_pixel(0, 0, Rgb::WHITE);
        sink.set_brightness(50);
        assert_eq!(sink.pixel(0, 0), Rgb::WHITE.scale(50));
    }
}
