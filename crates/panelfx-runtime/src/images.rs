#![forbid(unsafe_code)]

//! Decoded image cache.
//!
//! Decoding happens off the tick thread, once per path and panel size. A
//! failed decode is not retried until the path or size changes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use panelfx_core::{ImageFrame, ImageLoader, ImageStatus};

use crate::fetch::{Fetched, Fetcher};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ImageKey {
    path: PathBuf,
    width: u16,
    height: u16,
}

pub struct ImageCache {
    loader: Arc<dyn ImageLoader>,
    fetcher: Fetcher<ImageKey, ImageFrame>,
}

impl ImageCache {
    pub fn new(loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            loader,
            fetcher: Fetcher::new("image"),
        }
    }

    /// Status for `path` fitted to a `width x height` panel.
    pub fn status(&mut self, path: Option<&Path>, width: u16, height: u16) -> ImageStatus {
        let key = path.map(|path| ImageKey {
            path: path.to_path_buf(),
            width,
            height,
        });
        let loader = self.loader.clone();
        let fetched = self.fetcher.poll(key.as_ref(), None, move |key| {
            loader.load(&key.path, key.width, key.height)
        });
        match fetched {
            Fetched::Idle => ImageStatus::Unset,
            Fetched::Pending => ImageStatus::Loading,
            Fetched::Ready(frame) => ImageStatus::Ready(frame),
            Fetched::Failed => ImageStatus::Failed,
        }
    }

    /// Wait for an in-flight decode to finish.
    pub fn join(&mut self) {
        self.fetcher.join();
    }

    pub fn is_idle(&self) -> bool {
        self.fetcher.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelfx_core::StaticImageLoader;
    use panelfx_render::Rgb;

    #[test]
    fn unset_path() {
        let mut cache = ImageCache::new(Arc::new(StaticImageLoader::failing()));
        assert_eq!(cache.status(None, 64, 64), ImageStatus::Unset);
    }

    #[test]
    fn decodes_once() {
        let frame = ImageFrame::solid(8, 8, Rgb::RED);
        let mut cache = ImageCache::new(Arc::new(StaticImageLoader::new(frame.clone())));
        let path = Path::new("logo.png");
        cache.status(Some(path), 64, 64);
        cache.join();
        assert_eq!(cache.status(Some(path), 64, 64).frame(), Some(&frame));
        assert!(cache.is_idle());
    }

    #[test]
    fn failed_decode_is_reported() {
        let mut cache = ImageCache::new(Arc::new(StaticImageLoader::failing()));
        let path = Path::new("broken.png");
        cache.status(Some(path), 64, 64);
        cache.join();
        assert_eq!(cache.status(Some(path), 64, 64), ImageStatus::Failed);
    }
}
