use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use image::RgbaImage;

use super::*;
use crate::foundation::core::Size;
use crate::layout::bounds::{HorizontalAlignment, VerticalAlignment};
use crate::render::context::CpuContext;
use crate::video::effect::VideoEffect;
use crate::video::frame::FrameMetadata;

fn frame(w: u32, h: u32, ms: u64) -> VideoFrame {
    let buf = RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    VideoFrame::new(Arc::new(buf), Duration::from_millis(ms))
}

fn stage(w: f64, h: f64) -> Arc<Rect> {
    Arc::new(Rect::new(0.0, 0.0, w, h))
}

/// Records how often it ran and the metadata width it saw.
#[derive(Default)]
struct Probe {
    calls: AtomicU32,
    seen_width: AtomicU32,
}

impl VideoEffect for Probe {
    fn apply(&self, mut image: RgbaImage, frame: &FrameMetadata) -> RgbaImage {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_width.store(frame.width, Ordering::SeqCst);
        for px in image.pixels_mut() {
            px.0[0] = 255;
        }
        image
    }
}

#[test]
fn empty_queue_draws_nothing() {
    let parent = stage(40.0, 40.0);
    let mut src = LiveVideoSource::new();
    src.node_mut().set_parent(&parent);
    let mut ctx = CpuContext::default();
    src.layout(&mut ctx);
    assert!(src.draw(&mut ctx).is_none());
    assert_eq!(ctx.stats().images, 0);
}

#[test]
fn enqueue_and_reset_invalidate_layout() {
    let mut src = LiveVideoSource::new();
    let mut ctx = CpuContext::default();
    src.layout(&mut ctx);
    assert!(!src.node().needs_layout());

    assert_eq!(src.enqueue(frame(4, 4, 0)), EnqueueOutcome::Inserted);
    assert!(src.node().needs_layout());
    src.layout(&mut ctx);

    src.reset();
    assert!(src.node().needs_layout());
    assert!(src.queue().is_empty());
}

#[test]
fn fit_narrows_bounds_to_frame_aspect() {
    let parent = stage(40.0, 40.0);
    let mut src = LiveVideoSource::new();
    src.node_mut().set_parent(&parent);
    src.node_mut().set_horizontal_alignment(HorizontalAlignment::Center);
    src.node_mut().set_vertical_alignment(VerticalAlignment::Middle);
    src.enqueue(frame(200, 100, 0));

    let mut ctx = CpuContext::default();
    src.layout(&mut ctx);
    assert_eq!(src.node().bounds(), Rect::new(0.0, 10.0, 40.0, 30.0));

    let img = src.draw(&mut ctx).unwrap();
    assert_eq!(img.dimensions(), (40, 20));
}

#[test]
fn fill_keeps_base_bounds() {
    let parent = stage(40.0, 40.0);
    let mut src = LiveVideoSource::new();
    src.node_mut().set_parent(&parent);
    src.set_video_gravity(VideoGravity::Fill);
    src.enqueue(frame(200, 100, 0));

    let mut ctx = CpuContext::default();
    src.layout(&mut ctx);
    assert_eq!(src.node().bounds(), Rect::new(0.0, 0.0, 40.0, 40.0));
    assert_eq!(src.draw(&mut ctx).unwrap().dimensions(), (40, 40));
}

#[test]
fn root_without_parent_uses_declared_size() {
    let mut src = LiveVideoSource::new();
    src.node_mut().set_size(Size::new(30.0, 30.0));
    src.enqueue(frame(200, 100, 0));

    let mut ctx = CpuContext::default();
    src.layout(&mut ctx);
    assert_eq!(src.node().bounds(), Rect::new(0.0, 0.0, 30.0, 30.0));
    // Fit still scales the picture inside the declared box.
    assert_eq!(src.draw(&mut ctx).unwrap().dimensions(), (30, 15));
}

#[test]
fn draw_consumes_the_queued_frame() {
    let parent = stage(40.0, 40.0);
    let mut src = LiveVideoSource::new();
    src.node_mut().set_parent(&parent);
    src.enqueue(frame(40, 40, 0));

    let mut ctx = CpuContext::default();
    src.layout(&mut ctx);
    assert!(src.draw(&mut ctx).is_some());
    assert!(src.draw(&mut ctx).is_none());
}

#[test]
fn effects_see_original_metadata_and_keep_output_size() {
    let parent = stage(40.0, 40.0);
    let probe = Arc::new(Probe::default());
    let handle: EffectHandle = probe.clone();

    let mut src = LiveVideoSource::new();
    src.node_mut().set_parent(&parent);
    assert!(src.register_effect(handle.clone()));
    assert!(!src.register_effect(handle.clone()));
    src.enqueue(frame(200, 100, 0));

    let mut ctx = CpuContext::default();
    src.layout(&mut ctx);
    let img = src.draw(&mut ctx).unwrap();

    assert_eq!(img.dimensions(), (40, 20));
    assert_eq!(img.get_pixel(20, 10).0[0], 255);
    assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    assert_eq!(probe.seen_width.load(Ordering::SeqCst), 200);

    assert!(src.unregister_effect(&handle));
    assert!(src.effects().is_empty());
}

#[test]
fn hidden_node_leaves_queue_alone() {
    let parent = stage(40.0, 40.0);
    let mut src = LiveVideoSource::new();
    src.node_mut().set_parent(&parent);
    src.node_mut().set_visible(false);
    src.enqueue(frame(40, 40, 0));

    let mut ctx = CpuContext::default();
    src.layout(&mut ctx);
    assert!(src.draw(&mut ctx).is_none());
    assert_eq!(src.queue().len(), 1);
}

#[test]
fn switching_track_discards_pending_frame() {
    let mut src = LiveVideoSource::new();
    src.enqueue(frame(4, 4, 0));

    src.set_track(0);
    assert_eq!(src.queue().len(), 1);

    src.set_track(2);
    assert_eq!(src.track(), 2);
    assert!(src.queue().is_empty());
}

#[test]
fn gravity_change_invalidates_only_on_change() {
    let mut src = LiveVideoSource::new();
    let mut ctx = CpuContext::default();
    src.layout(&mut ctx);

    src.set_video_gravity(VideoGravity::Fit);
    assert!(!src.node().needs_layout());
    src.set_video_gravity(VideoGravity::Stretch);
    assert!(src.node().needs_layout());
}
