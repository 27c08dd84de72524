//! Screenstage lays out and renders the leaf sources of a composited screen.
//!
//! Each node ([`ImageSource`], [`LiveVideoSource`], [`TextSource`], [`AssetSource`]) computes
//! its bounds from alignment and margin rules relative to its parent, then produces one still
//! image per output frame through a shared [`RenderContext`]:
//!
//! - Call [`ScreenSource::layout`] on every node (a no-op unless invalidated)
//! - Call [`ScreenSource::draw`] to pull this frame's image
//! - Composite the returned [`StillImage`]s at each node's [`ScreenNode::bounds`]
#![forbid(unsafe_code)]

mod foundation;
mod layout;
mod media;
mod render;
mod scene;
mod text;
mod video;

pub use crate::foundation::clock::{HostClock, ManualClock, SystemClock};
pub use crate::foundation::core::{Affine, Edges, Point, Rect, Rgba8Premul, Size, Vec2};
pub use crate::foundation::error::{ScreenError, ScreenResult};

pub use crate::layout::bounds::{
    HorizontalAlignment, VerticalAlignment, aspect_fit_size, compute_bounds,
};
pub use crate::scene::node::{ParentBounds, ScreenNode, ScreenSource};
pub use crate::scene::still::ImageSource;

pub use crate::video::effect::{EffectChain, EffectHandle, VideoEffect};
pub use crate::video::frame::{FrameMetadata, VideoFrame};
pub use crate::video::gravity::{VideoGravity, region_to_extract, scale_image, scale_transform};
pub use crate::video::live::LiveVideoSource;
pub use crate::video::queue::{EnqueueOutcome, FrameQueue};

pub use crate::text::engine::{AttributedRun, TextBrush, TextLayoutEngine, TextStyle, TextSurface};
pub use crate::text::parley_engine::ParleyTextEngine;
pub use crate::text::source::TextSource;

pub use crate::media::asset::{AssetSource, ReaderState};
#[cfg(feature = "media-ffmpeg")]
pub use crate::media::ffmpeg::FfmpegReader;
pub use crate::media::ffmpeg::{FfmpegOpener, FfmpegOpts};
pub use crate::media::reader::{
    AssetReader, MediaAsset, MediaOpener, OutputSettings, PixelFormat, TrackInfo,
};

pub use crate::render::context::{
    CpuContext, CpuContextOpts, RenderContext, RenderStats, StillImage,
};
