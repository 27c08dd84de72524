use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;

use crate::foundation::core::Size;

/// Timing and geometry of a decoded frame, handed to effects alongside the working image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameMetadata {
    /// Intended display time relative to the start of the stream.
    pub presentation_time: Duration,
    /// Display duration, when the producer knows it.
    pub duration: Option<Duration>,
    /// Width of the decoded buffer in pixels.
    pub width: u32,
    /// Height of the decoded buffer in pixels.
    pub height: u32,
}

/// A decoded RGBA video frame. Cloning shares the pixel buffer.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    buffer: Arc<RgbaImage>,
    presentation_time: Duration,
    duration: Option<Duration>,
}

impl VideoFrame {
    pub fn new(buffer: Arc<RgbaImage>, presentation_time: Duration) -> Self {
        Self {
            buffer,
            presentation_time,
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn buffer(&self) -> &Arc<RgbaImage> {
        &self.buffer
    }

    pub fn presentation_time(&self) -> Duration {
        self.presentation_time
    }

    pub fn metadata(&self) -> FrameMetadata {
        FrameMetadata {
            presentation_time: self.presentation_time,
            duration: self.duration,
            width: self.buffer.width(),
            height: self.buffer.height(),
        }
    }

    /// Pixel dimensions, or `None` for an empty buffer.
    pub fn natural_size(&self) -> Option<Size> {
        let (w, h) = self.buffer.dimensions();
        (w > 0 && h > 0).then(|| Size::new(f64::from(w), f64::from(h)))
    }
}
