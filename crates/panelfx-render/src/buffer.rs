#![forbid(unsafe_code)]

//! Pixel buffer storage.
//!
//! The [`PixelBuffer`] is the frame every generator paints into. It is a
//! `width x height` grid of [`Rgb`] values plus the global brightness that is
//! forwarded to the sink when the frame is presented.
//!
//! # Layout
//!
//! Pixels are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `pixels.len() == width * height`
//! 2. Zero-sized buffers are valid; every write to them is a no-op
//! 3. `brightness` stays in `0..=100`
//! 4. Out-of-bounds writes are silently clipped

use crate::color::Rgb;

/// A 2D grid of panel pixels.
///
/// # Example
///
/// ```
/// use panelfx_render::{PixelBuffer, Rgb};
///
/// let mut buf = PixelBuffer::new(4, 2);
/// buf.set_pixel(1, 1, Rgb::RED);
/// buf.set_pixel(-3, 9, Rgb::RED); // clipped
/// assert_eq!(buf.get(1, 1), Some(Rgb::RED));
/// assert_eq!(buf.lit_pixels(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u16,
    height: u16,
    pixels: Vec<Rgb>,
    brightness: u8,
}

impl PixelBuffer {
    /// Default brightness for a freshly allocated buffer.
    pub const DEFAULT_BRIGHTNESS: u8 = 80;

    /// Create a black buffer with the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width as usize * height as usize],
            brightness: Self::DEFAULT_BRIGHTNESS,
        }
    }

    /// Buffer width in pixels.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in pixels.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Global brightness (`0..=100`).
    #[inline]
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Set the global brightness, clamped to 100.
    #[inline]
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness.min(100);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Set one pixel. Coordinates outside the buffer are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color;
        }
    }

    /// Read one pixel, `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    /// Set every pixel to black. Brightness is kept.
    pub fn clear(&mut self) {
        self.pixels.fill(Rgb::BLACK);
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Reallocate to new dimensions. Contents are cleared.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize(width as usize * height as usize, Rgb::BLACK);
    }

    /// Row-major pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Iterate `(x, y, color)` over every pixel in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, Rgb)> + '_ {
        let w = self.width.max(1) as usize;
        self.pixels
            .iter()
            .enumerate()
            .map(move |(i, &c)| ((i % w) as u16, (i / w) as u16, c))
    }

    /// Number of non-black pixels.
    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|c| !c.is_black()).count()
    }

    /// Returns `true` if every pixel is black.
    pub fn is_cleared(&self) -> bool {
        self.pixels.iter().all(|c| c.is_black())
    }
}

/// A decoded raster image ready to be blitted onto a [`PixelBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    width: u16,
    height: u16,
    pixels: Vec<Rgb>,
}

impl ImageFrame {
    /// Build a frame from row-major pixels.
    ///
    /// Returns `None` when `pixels.len() != width * height`.
    pub fn from_pixels(width: u16, height: u16, pixels: Vec<Rgb>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A solid-color frame.
    pub fn solid(width: u16, height: u16, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Pixel at `(x, y)`, `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }
}
