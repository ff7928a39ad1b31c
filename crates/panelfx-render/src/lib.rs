#![forbid(unsafe_code)]

//! Render kernel for LED panels: packed colors, pixel buffers, raster
//! primitives, bitmap text, and the output sink contract.
//!
//! # Role in panelfx
//! `panelfx-render` is the leaf crate. Generators in `panelfx-modes` paint
//! into a [`PixelBuffer`](buffer::PixelBuffer) through the [`Draw`](drawing::Draw)
//! helpers, and the runtime hands each finished buffer to a
//! [`DisplaySink`](sink::DisplaySink).

pub mod buffer;
pub mod color;
pub mod drawing;
pub mod headless;
pub mod sink;
pub mod text;

pub use buffer::{ImageFrame, PixelBuffer};
pub use color::{Gradient, Rgb, hsv_to_rgb};
pub use drawing::Draw;
pub use headless::HeadlessSink;
pub use sink::{DisplaySink, SinkError};
pub use text::{FontSize, MonoFontRenderer, TextRenderer};
