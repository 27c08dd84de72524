use crate::foundation::core::{Rect, Size, pixel_size};
use crate::render::context::{RenderContext, StillImage};
use crate::scene::node::{ScreenNode, ScreenSource};
use crate::text::engine::{AttributedRun, TextLayoutEngine, TextStyle, TextSurface};

/// Node that rasterizes a styled string and sizes itself to the text.
pub struct TextSource<E: TextLayoutEngine> {
    node: ScreenNode,
    engine: E,
    text: String,
    style: TextStyle,
    layout: Option<E::Layout>,
    surface: Option<TextSurface>,
}

impl<E: TextLayoutEngine> std::fmt::Debug for TextSource<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSource")
            .field("node", &self.node)
            .field("text", &self.text)
            .field("style", &self.style)
            .field("has_layout", &self.layout.is_some())
            .field("surface", &self.surface.as_ref().map(TextSurface::dimensions))
            .finish()
    }
}

impl<E: TextLayoutEngine> TextSource<E> {
    pub fn new(engine: E) -> Self {
        Self {
            node: ScreenNode::new(),
            engine,
            text: String::new(),
            style: TextStyle::default(),
            layout: None,
            surface: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.node.invalidate_layout();
        }
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: TextStyle) {
        if self.style != style {
            self.style = style;
            self.node.invalidate_layout();
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Whether a layout is cached from the last layout pass.
    pub fn has_layout(&self) -> bool {
        self.layout.is_some()
    }

    /// Pixel dimensions of the offscreen surface, if one is allocated.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface.as_ref().map(TextSurface::dimensions)
    }

    fn drop_layout(&mut self) -> Rect {
        self.layout = None;
        self.surface = None;
        Rect::ZERO
    }

    fn ensure_surface(&mut self, bounds: Rect) {
        let (w, h) = pixel_size(bounds.size());
        if w == 0 || h == 0 {
            self.surface = None;
            return;
        }
        if self.surface_size() != Some((w, h)) {
            tracing::debug!(w, h, "allocating text surface");
            self.surface = Some(TextSurface::new(w, h));
        }
    }
}

/// Engine constraints from the base bounds: zero axes are unbounded, `max_width` caps width.
pub(crate) fn text_constraints(base: Size, max_width_px: Option<f64>) -> Size {
    let unbounded = |v: f64| if v > 0.0 { v } else { f64::INFINITY };
    let mut width = unbounded(base.width);
    if let Some(max) = max_width_px.filter(|m| *m > 0.0) {
        width = width.min(max);
    }
    Size::new(width, unbounded(base.height))
}

impl<E: TextLayoutEngine> ScreenSource for TextSource<E> {
    fn node(&self) -> &ScreenNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ScreenNode {
        &mut self.node
    }

    fn bounds_for_layout(&mut self) -> Rect {
        if self.text.is_empty() {
            return self.drop_layout();
        }

        let base = self.node.compute_bounds(self.node.size());
        let constraints = text_constraints(base.size(), self.style.max_width_px);
        let run = AttributedRun::new(self.text.clone(), self.style.clone());

        let suggested = match self.engine.suggested_frame_size(&run, constraints) {
            Ok(size) => size,
            Err(err) => {
                tracing::warn!(error = %err, "text measurement failed");
                return self.drop_layout();
            }
        };
        if suggested.width <= 0.0 || suggested.height <= 0.0 {
            return self.drop_layout();
        }

        match self.engine.layout(&run, constraints) {
            Ok(layout) => self.layout = Some(layout),
            Err(err) => {
                tracing::warn!(error = %err, "text layout failed");
                return self.drop_layout();
            }
        }

        let bounds = self.node.compute_bounds(suggested);
        self.ensure_surface(bounds);
        bounds
    }

    fn produce_image(&mut self, ctx: &mut dyn RenderContext) -> Option<StillImage> {
        let (Some(layout), Some(surface)) = (self.layout.as_ref(), self.surface.as_mut()) else {
            return None;
        };
        surface.clear();
        if let Err(err) = self.engine.draw(layout, surface) {
            tracing::warn!(error = %err, "text draw failed");
            return None;
        }
        ctx.create_still_image(surface.image(), surface.extent())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/source.rs"]
mod tests;
