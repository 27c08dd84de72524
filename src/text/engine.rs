use image::RgbaImage;

use crate::foundation::core::{Rect, Size};
use crate::foundation::error::ScreenResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Straight (non-premultiplied) RGBA8 text color. Also used as the Parley brush.
pub struct TextBrush {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrush {
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn white() -> Self {
        Self::rgba(255, 255, 255, 255)
    }
}

/// Style attributes applied to a whole text run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font size in pixels. Must be finite and positive.
    pub font_size_px: f32,
    pub color: TextBrush,
    /// Upper bound on line width before wrapping.
    pub max_width_px: Option<f64>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size_px: 24.0,
            color: TextBrush::white(),
            max_width_px: None,
        }
    }
}

impl TextStyle {
    pub fn with_font_size(mut self, px: f32) -> Self {
        self.font_size_px = px;
        self
    }

    pub fn with_color(mut self, color: TextBrush) -> Self {
        self.color = color;
        self
    }

    pub fn with_max_width(mut self, px: Option<f64>) -> Self {
        self.max_width_px = px;
        self
    }
}

/// A string paired with the style it is laid out with.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributedRun {
    pub text: String,
    pub style: TextStyle,
}

impl AttributedRun {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Offscreen straight-alpha RGBA surface text is drawn into.
#[derive(Clone, Debug)]
pub struct TextSurface {
    image: RgbaImage,
}

impl TextSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn extent(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width()), f64::from(self.height()))
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = image::Rgba([0, 0, 0, 0]);
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }
}

/// Text shaping and rasterization collaborator used by [`TextSource`](crate::TextSource).
///
/// `constraints` carries the maximum width and height; an unbounded axis is `f64::INFINITY`.
pub trait TextLayoutEngine {
    /// Cached layout handle, valid until the text or bounds change.
    type Layout;

    /// Size the run wants within `constraints`.
    fn suggested_frame_size(
        &mut self,
        run: &AttributedRun,
        constraints: Size,
    ) -> ScreenResult<Size>;

    fn layout(&mut self, run: &AttributedRun, constraints: Size) -> ScreenResult<Self::Layout>;

    /// Rasterize `layout` into `surface`, whose origin is the layout's top-left corner.
    fn draw(&mut self, layout: &Self::Layout, surface: &mut TextSurface) -> ScreenResult<()>;
}
