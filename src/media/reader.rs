use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::error::ScreenResult;
use crate::video::frame::VideoFrame;

/// Handle to a media file on disk.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaAsset {
    path: PathBuf,
}

impl MediaAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Display for MediaAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A video track exposed by an opened reader.
pub struct TrackInfo {
    /// Container-level stream index.
    pub index: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Average frames per second, when the container reports one.
    pub frame_rate: Option<f64>,
    /// Track duration, when known.
    pub duration: Option<Duration>,
}

/// Pixel layout of decoded frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4 bytes per pixel, straight alpha, row-major.
    #[default]
    Rgba8,
}

/// Decode output configuration attached to a track before starting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputSettings {
    pub pixel_format: PixelFormat,
    /// When `false` the reader may hand out buffers it shares internally.
    pub always_copies_sample_data: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pixel_format: PixelFormat::Rgba8,
            always_copies_sample_data: false,
        }
    }
}

/// A reading session over one asset.
///
/// Lifecycle: `attach_output` then `start`, then `next_frame` until it returns `None`.
/// `cancel` may be called at any point and must be idempotent.
pub trait AssetReader: Send {
    fn video_tracks(&self) -> &[TrackInfo];

    fn attach_output(&mut self, track: &TrackInfo, settings: OutputSettings) -> ScreenResult<()>;

    fn start(&mut self) -> ScreenResult<()>;

    /// Next decoded frame in presentation order. `None` means end of stream or a decode stall
    /// the reader could not recover from.
    fn next_frame(&mut self) -> Option<VideoFrame>;

    fn cancel(&mut self);
}

/// Opens reading sessions.
///
/// Failures are reported as [`ScreenError::ReaderOpen`](crate::ScreenError::ReaderOpen).
pub trait MediaOpener: Send + Sync {
    fn open(&self, asset: &MediaAsset) -> ScreenResult<Box<dyn AssetReader>>;
}
