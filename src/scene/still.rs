use std::sync::Arc;

use anyhow::Context;
use image::RgbaImage;

use crate::foundation::core::Size;
use crate::foundation::error::ScreenResult;
use crate::render::context::{RenderContext, StillImage};
use crate::scene::node::{ScreenNode, ScreenSource};

/// Node showing one externally supplied still image, passed through untouched.
#[derive(Debug, Default)]
pub struct ImageSource {
    node: ScreenNode,
    image: Option<StillImage>,
}

impl ImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode PNG/JPEG/etc. bytes into a new image node.
    pub fn from_encoded(bytes: &[u8]) -> ScreenResult<Self> {
        let decoded = image::load_from_memory(bytes).context("decode image from memory")?;
        let mut source = Self::new();
        source.set_image(Some(Arc::new(decoded.to_rgba8())));
        Ok(source)
    }

    pub fn image(&self) -> Option<&StillImage> {
        self.image.as_ref()
    }

    /// Replace the held image; the declared size snaps to the new image's pixel size.
    ///
    /// Passing the same shared image again is a no-op.
    pub fn set_image(&mut self, image: Option<StillImage>) {
        let same = match (&self.image, &image) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }
        if let Some(img) = &image {
            self.node.set_size(natural_size(img));
        }
        self.image = image;
        self.node.invalidate_layout();
    }
}

impl ScreenSource for ImageSource {
    fn node(&self) -> &ScreenNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ScreenNode {
        &mut self.node
    }

    fn produce_image(&mut self, _ctx: &mut dyn RenderContext) -> Option<StillImage> {
        self.image.clone()
    }
}

fn natural_size(img: &RgbaImage) -> Size {
    Size::new(f64::from(img.width()), f64::from(img.height()))
}
