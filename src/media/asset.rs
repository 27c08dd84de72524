use std::sync::Arc;
use std::time::Duration;

use crate::foundation::clock::HostClock;
use crate::foundation::core::Rect;
use crate::foundation::error::{ScreenError, ScreenResult};
use crate::media::reader::{AssetReader, MediaAsset, MediaOpener, OutputSettings, TrackInfo};
use crate::render::context::{RenderContext, StillImage};
use crate::scene::node::{ScreenNode, ScreenSource};
use crate::video::frame::VideoFrame;
use crate::video::gravity::{
    VideoGravity, extent_of, gravity_bounds, region_to_extract, scale_image,
};

/// Whether an [`AssetSource`] currently owns a reader session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderState {
    Idle,
    Reading,
}

/// Node that plays a media file, advancing frames against a host clock.
///
/// Pacing is poll-driven: every visible draw shows the held frame and then advances if the
/// frame's presentation time has been reached.
pub struct AssetSource {
    node: ScreenNode,
    opener: Arc<dyn MediaOpener>,
    clock: Arc<dyn HostClock>,
    reader: Option<Box<dyn AssetReader>>,
    track: Option<TrackInfo>,
    held: Option<VideoFrame>,
    started_at: Duration,
    video_gravity: VideoGravity,
}

impl std::fmt::Debug for AssetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetSource")
            .field("node", &self.node)
            .field("state", &self.state())
            .field("track", &self.track)
            .field("held_pts", &self.held.as_ref().map(VideoFrame::presentation_time))
            .field("started_at", &self.started_at)
            .field("video_gravity", &self.video_gravity)
            .finish()
    }
}

impl AssetSource {
    pub fn new(opener: Arc<dyn MediaOpener>, clock: Arc<dyn HostClock>) -> Self {
        Self {
            node: ScreenNode::new(),
            opener,
            clock,
            reader: None,
            track: None,
            held: None,
            started_at: Duration::ZERO,
            video_gravity: VideoGravity::default(),
        }
    }

    pub fn state(&self) -> ReaderState {
        if self.reader.is_some() {
            ReaderState::Reading
        } else {
            ReaderState::Idle
        }
    }

    /// Frame shown by the next draw.
    pub fn held_frame(&self) -> Option<&VideoFrame> {
        self.held.as_ref()
    }

    /// Track selected for the active session.
    pub fn track(&self) -> Option<&TrackInfo> {
        self.track.as_ref()
    }

    pub fn video_gravity(&self) -> VideoGravity {
        self.video_gravity
    }

    pub fn set_video_gravity(&mut self, gravity: VideoGravity) {
        if self.video_gravity != gravity {
            self.video_gravity = gravity;
            self.node.invalidate_layout();
        }
    }

    /// Replace any active session with a new one on `asset` and pull its first frame.
    ///
    /// Open and start failures are returned as [`ScreenError::ReaderOpen`]; the node is left
    /// idle in that case. An asset without a video track starts and immediately goes idle.
    #[tracing::instrument(skip(self, asset), fields(asset = %asset))]
    pub fn start_reading(&mut self, asset: &MediaAsset) -> ScreenResult<()> {
        self.cancel_reading();

        let mut reader = self.opener.open(asset).map_err(|e| as_open_error(asset, e))?;
        let Some(track) = reader.video_tracks().first().cloned() else {
            tracing::debug!("asset has no video track");
            reader.cancel();
            return Ok(());
        };

        if let Err(err) = reader.attach_output(&track, OutputSettings::default()) {
            reader.cancel();
            return Err(as_open_error(asset, err));
        }
        self.started_at = self.clock.now();
        if let Err(err) = reader.start() {
            reader.cancel();
            return Err(as_open_error(asset, err));
        }

        tracing::debug!(track = track.index, w = track.width, h = track.height, "reading started");
        self.reader = Some(reader);
        self.track = Some(track);
        self.advance();
        Ok(())
    }

    /// Tear down the active session, if any, and drop the held frame.
    pub fn cancel_reading(&mut self) {
        if let Some(mut reader) = self.reader.take() {
            reader.cancel();
        }
        self.track = None;
        if self.held.take().is_some() {
            self.node.invalidate_layout();
        }
    }

    /// Advance to the next decoded frame if the held one is due.
    pub fn tick(&mut self) {
        let Some(held) = &self.held else {
            return;
        };
        let elapsed = self.clock.now().saturating_sub(self.started_at);
        if held.presentation_time() <= elapsed {
            self.advance();
        }
    }

    /// Pull one frame, replacing the held frame. End of stream cancels the session.
    fn advance(&mut self) {
        let Some(next) = self.reader.as_mut().and_then(|r| r.next_frame()) else {
            tracing::debug!("asset reader reached end of stream");
            self.cancel_reading();
            return;
        };
        let resized = self.held.as_ref().and_then(VideoFrame::natural_size) != next.natural_size();
        if resized {
            self.node.invalidate_layout();
        }
        self.held = Some(next);
    }
}

impl Drop for AssetSource {
    fn drop(&mut self) {
        self.cancel_reading();
    }
}

fn as_open_error(asset: &MediaAsset, err: ScreenError) -> ScreenError {
    if err.is_reader_open() {
        err
    } else {
        ScreenError::reader_open(asset.to_string(), err.to_string())
    }
}

impl ScreenSource for AssetSource {
    fn node(&self) -> &ScreenNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ScreenNode {
        &mut self.node
    }

    fn bounds_for_layout(&mut self) -> Rect {
        let natural = self.held.as_ref().and_then(VideoFrame::natural_size);
        gravity_bounds(&self.node, natural, self.video_gravity)
    }

    fn produce_image(&mut self, ctx: &mut dyn RenderContext) -> Option<StillImage> {
        let frame = self.held.as_ref()?;
        let bounds = self.node.bounds();
        let working = scale_image(frame.buffer(), bounds, self.video_gravity)?;
        let region = region_to_extract(bounds, extent_of(&working), self.video_gravity);
        ctx.create_still_image(&working, region)
    }

    fn draw(&mut self, ctx: &mut dyn RenderContext) -> Option<StillImage> {
        ctx.on_draw(&self.node);
        if !self.node.is_visible() {
            return None;
        }
        let image = self.produce_image(ctx);
        self.tick();
        image
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/asset.rs"]
mod tests;
