use image::RgbaImage;
use image::imageops::FilterType;

use crate::foundation::core::{Affine, Point, Rect, Size, pixel_size};
use crate::layout::bounds::aspect_fit_size;
use crate::scene::node::ScreenNode;

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// How a video frame is scaled into its node's bounds.
pub enum VideoGravity {
    /// Preserve aspect ratio and fit inside the bounds.
    #[default]
    Fit,
    /// Scale to cover the bounds exactly.
    Fill,
    /// Plain resize to the bounds. Treated like [`VideoGravity::Fill`].
    Stretch,
}

impl VideoGravity {
    pub fn preserves_aspect(self) -> bool {
        matches!(self, Self::Fit)
    }

    /// Candidate size for layout given a frame's natural size and the would-be bounds.
    ///
    /// `Fit` shrinks the candidate to the largest aspect-correct size; other modes keep `base`.
    pub(crate) fn layout_candidate(self, natural: Size, base: Size) -> Size {
        match self {
            Self::Fit => aspect_fit_size(natural, base),
            Self::Fill | Self::Stretch => base,
        }
    }
}

/// Scale that maps an image of `native` size into `target` under `gravity`.
pub fn scale_transform(target: Rect, native: Size, gravity: VideoGravity) -> Affine {
    if native.width <= 0.0 || native.height <= 0.0 {
        return Affine::scale(0.0);
    }
    let sx = target.width() / native.width;
    let sy = target.height() / native.height;
    match gravity {
        VideoGravity::Fit => Affine::scale(sx.min(sy)),
        VideoGravity::Fill | VideoGravity::Stretch => Affine::scale_non_uniform(sx, sy),
    }
}

/// Part of a scaled image (with extent `image`) that ends up on screen for `target`.
pub fn region_to_extract(target: Rect, image: Rect, gravity: VideoGravity) -> Rect {
    match gravity {
        VideoGravity::Fit => {
            let origin = Point::new(
                image.x0 + (image.width() - target.width()) / 2.0,
                image.y0 + (image.height() - target.height()) / 2.0,
            );
            Rect::from_origin_size(origin, target.size())
        }
        VideoGravity::Fill | VideoGravity::Stretch => {
            Rect::from_origin_size(image.origin(), target.size())
        }
    }
}

/// Resample `buffer` for display in `target`. `None` when either side has no pixels.
pub fn scale_image(buffer: &RgbaImage, target: Rect, gravity: VideoGravity) -> Option<RgbaImage> {
    let (nw, nh) = buffer.dimensions();
    let native = Size::new(f64::from(nw), f64::from(nh));
    let (tw, th) = pixel_size(target.size());
    if nw == 0 || nh == 0 || tw == 0 || th == 0 {
        return None;
    }

    let scaled = scale_transform(target, native, gravity)
        .transform_rect_bbox(Rect::from_origin_size(Point::ZERO, native));
    let (w, h) = pixel_size(scaled.size());
    // Rounding must never push a fit result past the target.
    let (w, h) = (w.clamp(1, tw), h.clamp(1, th));

    if (w, h) == (nw, nh) {
        return Some(buffer.clone());
    }
    Some(image::imageops::resize(buffer, w, h, FilterType::Triangle))
}

/// Layout bounds for a video-backed node whose current frame has `natural` pixel size.
///
/// With a parent and fit gravity the candidate shrinks to the aspect-correct size inside the
/// base bounds; otherwise the base bounds are used as-is.
pub(crate) fn gravity_bounds(
    node: &ScreenNode,
    natural: Option<Size>,
    gravity: VideoGravity,
) -> Rect {
    let base = node.compute_bounds(node.size());
    match natural {
        Some(natural) if node.has_parent() && gravity.preserves_aspect() => {
            node.compute_bounds(gravity.layout_candidate(natural, base.size()))
        }
        _ => base,
    }
}

/// Extent rectangle of an image, anchored at the origin.
pub(crate) fn extent_of(image: &RgbaImage) -> Rect {
    Rect::new(0.0, 0.0, f64::from(image.width()), f64::from(image.height()))
}

#[cfg(test)]
#[path = "../../tests/unit/video/gravity.rs"]
mod tests;
