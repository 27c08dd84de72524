use std::sync::{Arc, RwLock, Weak};

use crate::foundation::core::{Edges, Rect, Size};
use crate::layout::bounds::{HorizontalAlignment, VerticalAlignment, compute_bounds};
use crate::render::context::{RenderContext, StillImage};

/// Upward geometry query a container answers for its children.
pub trait ParentBounds: Send + Sync {
    /// Current bounds of the container in screen space.
    fn bounds(&self) -> Rect;
}

impl ParentBounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

impl ParentBounds for RwLock<Rect> {
    fn bounds(&self) -> Rect {
        match self.read() {
            Ok(r) => *r,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Geometry and presentation state shared by every source variant.
///
/// `bounds` is only ever written by the layout pass ([`ScreenSource::layout`]).
#[derive(Debug)]
pub struct ScreenNode {
    size: Size,
    bounds: Rect,
    is_visible: bool,
    corner_radius: f64,
    layout_margin: Edges,
    horizontal_alignment: HorizontalAlignment,
    vertical_alignment: VerticalAlignment,
    parent: Option<Weak<dyn ParentBounds>>,
    layout_dirty: bool,
}

impl Default for ScreenNode {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenNode {
    /// A visible, unparented node with zero declared size. Starts out needing layout.
    pub fn new() -> Self {
        Self {
            size: Size::ZERO,
            bounds: Rect::ZERO,
            is_visible: true,
            corner_radius: 0.0,
            layout_margin: Edges::default(),
            horizontal_alignment: HorizontalAlignment::default(),
            vertical_alignment: VerticalAlignment::default(),
            parent: None,
            layout_dirty: true,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Declared size. A zero axis fills the parent along that axis.
    pub fn set_size(&mut self, size: Size) {
        if self.size != size {
            self.size = size;
            self.layout_dirty = true;
        }
    }

    /// Last rectangle computed by the layout pass.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }

    pub fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    pub fn set_corner_radius(&mut self, radius: f64) {
        self.corner_radius = radius;
    }

    pub fn layout_margin(&self) -> Edges {
        self.layout_margin
    }

    pub fn set_layout_margin(&mut self, margin: Edges) {
        if self.layout_margin != margin {
            self.layout_margin = margin;
            self.layout_dirty = true;
        }
    }

    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.horizontal_alignment
    }

    pub fn set_horizontal_alignment(&mut self, align: HorizontalAlignment) {
        if self.horizontal_alignment != align {
            self.horizontal_alignment = align;
            self.layout_dirty = true;
        }
    }

    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.vertical_alignment
    }

    pub fn set_vertical_alignment(&mut self, align: VerticalAlignment) {
        if self.vertical_alignment != align {
            self.vertical_alignment = align;
            self.layout_dirty = true;
        }
    }

    /// Attach to a container. Only a weak link is kept; dropping the container detaches.
    pub fn set_parent<P: ParentBounds + 'static>(&mut self, parent: &Arc<P>) {
        let weak: Weak<P> = Arc::downgrade(parent);
        let weak: Weak<dyn ParentBounds> = weak;
        let same = self
            .parent
            .as_ref()
            .is_some_and(|current| Weak::ptr_eq(current, &weak));
        if !same {
            self.parent = Some(weak);
            self.layout_dirty = true;
        }
    }

    pub fn clear_parent(&mut self) {
        if self.parent.take().is_some() {
            self.layout_dirty = true;
        }
    }

    /// Bounds of the parent, or `None` for roots and for parents that have been dropped.
    pub fn parent_bounds(&self) -> Option<Rect> {
        self.parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|p| p.bounds())
    }

    pub fn has_parent(&self) -> bool {
        self.parent_bounds().is_some()
    }

    pub fn needs_layout(&self) -> bool {
        self.layout_dirty
    }

    /// Force the next layout pass to recompute, e.g. after the parent was resized.
    pub fn invalidate_layout(&mut self) {
        self.layout_dirty = true;
    }

    /// Base bounds computation for `candidate`, using this node's margin, alignment and parent.
    pub fn compute_bounds(&self, candidate: Size) -> Rect {
        compute_bounds(
            candidate,
            self.parent_bounds(),
            self.layout_margin,
            self.horizontal_alignment,
            self.vertical_alignment,
        )
    }

    pub(crate) fn commit_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub(crate) fn clear_layout_dirty(&mut self) {
        self.layout_dirty = false;
    }
}

/// Layout and draw contract shared by every renderable source.
///
/// Implementors provide [`produce_image`](ScreenSource::produce_image) and may override
/// [`bounds_for_layout`](ScreenSource::bounds_for_layout) to substitute a natural candidate size.
pub trait ScreenSource {
    fn node(&self) -> &ScreenNode;

    fn node_mut(&mut self) -> &mut ScreenNode;

    /// Bounds the next layout pass should commit. Defaults to the declared size.
    fn bounds_for_layout(&mut self) -> Rect {
        let node = self.node();
        node.compute_bounds(node.size())
    }

    /// Still image for the current frame, or `None` when there is nothing to show.
    fn produce_image(&mut self, ctx: &mut dyn RenderContext) -> Option<StillImage>;

    /// Recompute bounds if invalidated, notify the context, then clear the dirty flag.
    fn layout(&mut self, ctx: &mut dyn RenderContext) {
        if !self.node().needs_layout() {
            return;
        }
        let bounds = self.bounds_for_layout();
        self.node_mut().commit_bounds(bounds);
        ctx.on_layout_computed(self.node());
        self.node_mut().clear_layout_dirty();
    }

    /// Produce this frame's image. Hidden nodes yield `None` without touching their pipeline.
    fn draw(&mut self, ctx: &mut dyn RenderContext) -> Option<StillImage> {
        ctx.on_draw(self.node());
        if !self.node().is_visible() {
            return None;
        }
        self.produce_image(ctx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
