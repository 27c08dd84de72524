use std::sync::Arc;

use image::RgbaImage;
use kurbo::Shape;

use crate::foundation::core::{Rect, pixel_size};
use crate::scene::node::ScreenNode;

/// Still image handed back to the render driver. Cheap to clone.
pub type StillImage = Arc<RgbaImage>;

/// Image-creation and notification capability shared by all nodes in a tree.
pub trait RenderContext {
    /// Snapshot `region` (image space) of a working image as a still image.
    ///
    /// Returns `None` when the region does not overlap the image.
    fn create_still_image(&mut self, image: &RgbaImage, region: Rect) -> Option<StillImage>;

    /// Called after a node committed new bounds.
    fn on_layout_computed(&mut self, _node: &ScreenNode) {}

    /// Called at the start of every draw of a node.
    fn on_draw(&mut self, _node: &ScreenNode) {}
}

/// Options for [`CpuContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuContextOpts {
    pub(crate) clear_rgba: Option<[u8; 4]>,
}

impl CpuContextOpts {
    /// Return options with a background color composited under every produced image.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }
}

/// Per-context counters, reset with [`CpuContext::take_stats`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// Layout passes that committed bounds.
    pub layouts: u64,
    /// Draw calls, including hidden and empty nodes.
    pub draws: u64,
    /// Still images created through the context.
    pub images: u64,
}

/// CPU [`RenderContext`] built on the `image` crate.
///
/// Applies the corner radius of the node currently being drawn as an alpha mask.
#[derive(Debug, Default)]
pub struct CpuContext {
    opts: CpuContextOpts,
    stats: RenderStats,
    corner_radius: f64,
}

impl CpuContext {
    pub fn new(opts: CpuContextOpts) -> Self {
        Self {
            opts,
            stats: RenderStats::default(),
            corner_radius: 0.0,
        }
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn take_stats(&mut self) -> RenderStats {
        std::mem::take(&mut self.stats)
    }
}

impl RenderContext for CpuContext {
    fn create_still_image(&mut self, image: &RgbaImage, region: Rect) -> Option<StillImage> {
        let extent = Rect::new(0.0, 0.0, f64::from(image.width()), f64::from(image.height()));
        let clipped = region.round().intersect(extent);
        let (w, h) = pixel_size(clipped.size());
        if w == 0 || h == 0 {
            return None;
        }

        let x = clipped.x0.max(0.0) as u32;
        let y = clipped.y0.max(0.0) as u32;
        let mut out = image::imageops::crop_imm(image, x, y, w, h).to_image();

        if self.corner_radius > 0.0 {
            apply_corner_mask(&mut out, self.corner_radius);
        }
        if let Some(clear) = self.opts.clear_rgba {
            let mut bg = RgbaImage::from_pixel(w, h, image::Rgba(clear));
            image::imageops::overlay(&mut bg, &out, 0, 0);
            out = bg;
        }

        self.stats.images = self.stats.images.saturating_add(1);
        Some(Arc::new(out))
    }

    fn on_layout_computed(&mut self, _node: &ScreenNode) {
        self.stats.layouts = self.stats.layouts.saturating_add(1);
    }

    fn on_draw(&mut self, node: &ScreenNode) {
        self.stats.draws = self.stats.draws.saturating_add(1);
        self.corner_radius = node.corner_radius();
    }
}

/// Zero out pixels whose centers fall outside the rounded rectangle covering `img`.
fn apply_corner_mask(img: &mut RgbaImage, radius: f64) {
    let (w, h) = img.dimensions();
    let radius = radius.min(f64::from(w.min(h)) / 2.0);
    let shape = kurbo::RoundedRect::new(0.0, 0.0, f64::from(w), f64::from(h), radius);
    // Only the corner squares can be outside the shape.
    let r = radius.ceil() as u32;
    for (x, y, px) in img.enumerate_pixels_mut() {
        let in_corner_band = (x < r || x + r >= w) && (y < r || y + r >= h);
        if !in_corner_band {
            continue;
        }
        let center = kurbo::Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        if !shape.contains(center) {
            *px = image::Rgba([0, 0, 0, 0]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
