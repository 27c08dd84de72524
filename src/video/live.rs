use crate::foundation::core::Rect;
use crate::render::context::{RenderContext, StillImage};
use crate::scene::node::{ScreenNode, ScreenSource};
use crate::video::effect::{EffectChain, EffectHandle};
use crate::video::frame::VideoFrame;
use crate::video::gravity::{
    VideoGravity, extent_of, gravity_bounds, region_to_extract, scale_image,
};
use crate::video::queue::{EnqueueOutcome, FrameQueue};

/// Node that shows the most recent frame pushed by a live video producer.
///
/// Each draw consumes the queued frame; with nothing queued the node renders nothing.
#[derive(Debug, Default)]
pub struct LiveVideoSource {
    node: ScreenNode,
    queue: FrameQueue,
    effects: EffectChain,
    video_gravity: VideoGravity,
    track: u8,
}

impl LiveVideoSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a decoded frame. The frame may change the natural size, so layout is invalidated.
    pub fn enqueue(&mut self, frame: VideoFrame) -> EnqueueOutcome {
        let outcome = self.queue.enqueue(frame);
        self.node.invalidate_layout();
        outcome
    }

    /// Drop any queued frame.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.node.invalidate_layout();
    }

    pub fn queue(&self) -> &FrameQueue {
        &self.queue
    }

    pub fn register_effect(&mut self, effect: EffectHandle) -> bool {
        self.effects.register(effect)
    }

    pub fn unregister_effect(&mut self, effect: &EffectHandle) -> bool {
        self.effects.unregister(effect)
    }

    pub fn effects(&self) -> &EffectChain {
        &self.effects
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

    pub fn track(&self) -> u8 {
        self.track
    }

    /// Switch the upstream track. Frames from the previous track are discarded.
    pub fn set_track(&mut self, track: u8) {
        if self.track != track {
            self.track = track;
            self.reset();
        }
    }
}

impl ScreenSource for LiveVideoSource {
    fn node(&self) -> &ScreenNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ScreenNode {
        &mut self.node
    }

    fn bounds_for_layout(&mut self) -> Rect {
        let natural = self.queue.head().and_then(VideoFrame::natural_size);
        gravity_bounds(&self.node, natural, self.video_gravity)
    }

    fn produce_image(&mut self, ctx: &mut dyn RenderContext) -> Option<StillImage> {
        let frame = self.queue.dequeue()?;
        let bounds = self.node.bounds();
        let mut working = scale_image(frame.buffer(), bounds, self.video_gravity)?;
        if !self.effects.is_empty() {
            working = self.effects.apply(working, &frame.metadata());
        }
        let region = region_to_extract(bounds, extent_of(&working), self.video_gravity);
        ctx.create_still_image(&working, region)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/live.rs"]
mod tests;
