#![forbid(unsafe_code)]

//! Image loading contract for the Image mode.
//!
//! Decoding runs off the tick thread. The Image generator only sees an
//! [`ImageStatus`]. With the `image` feature, [`DecodingImageLoader`] reads
//! PNG, GIF and JPEG files and shrinks them to fit the panel.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub use panelfx_render::ImageFrame;

/// Errors raised while loading an image.
#[derive(Debug)]
pub enum ImageError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The bytes are not a supported image.
    Decode(String),
    /// No decoder is available in this build.
    Unsupported,
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Io(e) => write!(f, "image I/O error: {e}"),
            ImageError::Decode(msg) => write!(f, "image decode error: {msg}"),
            ImageError::Unsupported => write!(f, "image decoding not available"),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ImageError {
    fn from(e: std::io::Error) -> Self {
        ImageError::Io(e)
    }
}

/// Turns a file into a frame no larger than `width x height`.
pub trait ImageLoader: Send + Sync {
    fn load(&self, path: &Path, width: u16, height: u16) -> Result<ImageFrame, ImageError>;
}

/// Serves one pre-built frame for every path. Useful in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticImageLoader {
    frame: Option<ImageFrame>,
}

impl StaticImageLoader {
    pub fn new(frame: ImageFrame) -> Self {
        Self { frame: Some(frame) }
    }

    /// A loader that fails every request.
    pub fn failing() -> Self {
        Self { frame: None }
    }
}

impl ImageLoader for StaticImageLoader {
    fn load(&self, _path: &Path, _width: u16, _height: u16) -> Result<ImageFrame, ImageError> {
        self.frame
            .clone()
            .ok_or_else(|| ImageError::Decode("no frame configured".into()))
    }
}

/// What the Image mode can show right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageStatus {
    /// No image path set.
    #[default]
    Unset,
    /// Decode in flight and nothing cached.
    Loading,
    /// A decoded frame is cached.
    Ready(Arc<ImageFrame>),
    /// The last decode failed and nothing is cached.
    Failed,
}

impl ImageStatus {
    /// The cached frame, if any.
    pub fn frame(&self) -> Option<&ImageFrame> {
        match self {
            ImageStatus::Ready(frame) => Some(frame.as_ref()),
            _ => None,
        }
    }

    /// Placeholder text for states without a frame.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            ImageStatus::Unset => Some("NO IMAGE"),
            ImageStatus::Loading => Some("LOADING"),
            ImageStatus::Failed => Some("BAD IMAGE"),
            ImageStatus::Ready(_) => None,
        }
    }
}

#[cfg(feature = "image")]
mod decoding {
    use std::path::Path;

    use image::imageops::FilterType;
    use panelfx_render::{ImageFrame, Rgb};

    use super::{ImageError, ImageLoader};

    impl From<image::ImageError> for ImageError {
        fn from(err: image::ImageError) -> Self {
            match err {
                image::ImageError::IoError(e) => ImageError::Io(e),
                other => ImageError::Decode(other.to_string()),
            }
        }
    }

    /// Decodes files with the `image` crate, preserving aspect ratio.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct DecodingImageLoader;

    impl ImageLoader for DecodingImageLoader {
        fn load(&self, path: &Path, width: u16, height: u16) -> Result<ImageFrame, ImageError> {
            let img = image::open(path)?;
            let fitted = if img.width() > u32::from(width) || img.height() > u32::from(height) {
                img.resize(u32::from(width), u32::from(height), FilterType::Triangle)
            } else {
                img
            };
            let rgb = fitted.to_rgb8();
            let pixels = rgb.pixels().map(|p| Rgb::new(p[0], p[1], p[2])).collect();
            ImageFrame::from_pixels(rgb.width() as u16, rgb.height() as u16, pixels)
                .ok_or_else(|| ImageError::Decode("pixel count mismatch".into()))
        }
    }

}

#[cfg(feature = "image")]
pub use decoding::DecodingImageLoader;
