pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Four-sided inset in pixels, used for layout margins.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct Edges {
    /// Left inset.
    #[serde(default)]
    pub left: f64,
    /// Right inset.
    #[serde(default)]
    pub right: f64,
    /// Top inset.
    #[serde(default)]
    pub top: f64,
    /// Bottom inset.
    #[serde(default)]
    pub bottom: f64,
}

impl Edges {
    /// Same inset on every side.
    pub fn uniform(v: f64) -> Self {
        Self {
            left: v,
            right: v,
            top: v,
            bottom: v,
        }
    }

    /// Sum of left and right insets.
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom insets.
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    /// Undo premultiplication, e.g. before storing into an `image::RgbaImage`.
    pub fn to_straight(self) -> [u8; 4] {
        if self.a == 0 {
            return [0, 0, 0, 0];
        }
        let a = u16::from(self.a);
        let unpremul = |c: u8| ((u16::from(c) * 255 + a / 2) / a).min(255) as u8;
        [unpremul(self.r), unpremul(self.g), unpremul(self.b), self.a]
    }
}

/// Whole-pixel dimensions of a rectangle, rounded to nearest. Negative or NaN extents map to 0.
pub(crate) fn pixel_size(size: Size) -> (u32, u32) {
    fn px(v: f64) -> u32 {
        if v.is_finite() && v > 0.0 {
            v.round().min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }
    (px(size.width), px(size.height))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
