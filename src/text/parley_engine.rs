use crate::foundation::core::{Rgba8Premul, Size};
use crate::foundation::error::{ScreenError, ScreenResult};
use crate::text::engine::{AttributedRun, TextBrush, TextLayoutEngine, TextSurface};

/// [`TextLayoutEngine`] backed by Parley for shaping and `vello_cpu` for glyph rasterization.
///
/// Every run is laid out in the single font family registered from the bytes passed to
/// [`ParleyTextEngine::with_font`].
pub struct ParleyTextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
    raster: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for ParleyTextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyTextEngine")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl ParleyTextEngine {
    /// Register a TrueType/OpenType font and use its first family for every layout.
    pub fn with_font(font_bytes: Vec<u8>) -> ScreenResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ScreenError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ScreenError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0),
            raster: None,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn build(
        &mut self,
        run: &AttributedRun,
        constraints: Size,
    ) -> ScreenResult<parley::Layout<TextBrush>> {
        let size_px = run.style.font_size_px;
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ScreenError::validation(
                "text font_size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &run.text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(run.style.color));

        let mut layout: parley::Layout<TextBrush> = builder.build(&run.text);
        let max_width = (constraints.width.is_finite() && constraints.width > 0.0)
            .then_some(constraints.width as f32);
        if let Some(w) = max_width {
            layout.break_all_lines(Some(w));
            layout.align(
                Some(w),
                parley::Alignment::Start,
                parley::AlignmentOptions::default(),
            );
        } else {
            layout.break_all_lines(None);
        }
        Ok(layout)
    }

    fn raster_ctx(&mut self, width: u16, height: u16) -> vello_cpu::RenderContext {
        let mut ctx = match self.raster.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx
    }
}

impl TextLayoutEngine for ParleyTextEngine {
    type Layout = parley::Layout<TextBrush>;

    fn suggested_frame_size(
        &mut self,
        run: &AttributedRun,
        constraints: Size,
    ) -> ScreenResult<Size> {
        let layout = self.build(run, constraints)?;
        Ok(Size::new(
            f64::from(layout.width()).ceil().min(constraints.width),
            f64::from(layout.height()).ceil().min(constraints.height),
        ))
    }

    fn layout(&mut self, run: &AttributedRun, constraints: Size) -> ScreenResult<Self::Layout> {
        self.build(run, constraints)
    }

    fn draw(&mut self, layout: &Self::Layout, surface: &mut TextSurface) -> ScreenResult<()> {
        let (w, h) = surface.dimensions();
        let to_u16 = |v: u32| {
            u16::try_from(v)
                .map_err(|_| ScreenError::validation(format!("text surface too large: {w}x{h}")))
        };
        let (w16, h16) = (to_u16(w)?, to_u16(h)?);
        if w16 == 0 || h16 == 0 {
            return Ok(());
        }

        let mut ctx = self.raster_ctx(w16, h16);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        self.raster = Some(ctx);

        for (dst, src) in surface
            .image_mut()
            .pixels_mut()
            .zip(pixmap.data_as_u8_slice().chunks_exact(4))
        {
            let premul = Rgba8Premul {
                r: src[0],
                g: src[1],
                b: src[2],
                a: src[3],
            };
            dst.0 = premul.to_straight();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/parley_engine.rs"]
mod tests;
