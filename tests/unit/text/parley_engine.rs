use super::*;
use crate::text::engine::TextStyle;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn system_font() -> Option<Vec<u8>> {
    FONT_CANDIDATES.iter().find_map(|p| std::fs::read(p).ok())
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let err = ParleyTextEngine::with_font(b"not a font".to_vec()).unwrap_err();
    assert!(matches!(err, ScreenError::Validation(_)));
}

#[test]
fn non_positive_font_size_is_rejected() {
    let Some(font) = system_font() else {
        return;
    };
    let mut engine = ParleyTextEngine::with_font(font).unwrap();
    let run = AttributedRun::new("hi", TextStyle::default().with_font_size(0.0));
    assert!(
        engine
            .suggested_frame_size(&run, Size::new(f64::INFINITY, f64::INFINITY))
            .is_err()
    );
}

#[test]
fn wrapping_respects_width_constraint() {
    let Some(font) = system_font() else {
        return;
    };
    let mut engine = ParleyTextEngine::with_font(font).unwrap();
    assert!(!engine.family_name().trim().is_empty());

    let run = AttributedRun::new("the quick brown fox jumps", TextStyle::default());
    let unbounded = engine
        .suggested_frame_size(&run, Size::new(f64::INFINITY, f64::INFINITY))
        .unwrap();
    let narrow = engine
        .suggested_frame_size(&run, Size::new(80.0, f64::INFINITY))
        .unwrap();

    assert!(unbounded.width > 80.0);
    assert!(narrow.width <= 80.0);
    assert!(narrow.height > unbounded.height);
}

#[test]
fn draw_paints_glyph_coverage() {
    let Some(font) = system_font() else {
        return;
    };
    let mut engine = ParleyTextEngine::with_font(font).unwrap();
    let run = AttributedRun::new("Hello", TextStyle::default().with_font_size(32.0));
    let bounds = Size::new(f64::INFINITY, f64::INFINITY);
    let size = engine.suggested_frame_size(&run, bounds).unwrap();
    let layout = engine.layout(&run, bounds).unwrap();

    let mut surface = TextSurface::new(size.width as u32, size.height as u32);
    engine.draw(&layout, &mut surface).unwrap();

    let covered = surface.image().pixels().filter(|p| p.0[3] > 0).count();
    assert!(covered > 0);
    // White text stays white after un-premultiplying fully covered pixels.
    assert!(
        surface
            .image()
            .pixels()
            .filter(|p| p.0[3] == 255)
            .all(|p| p.0[0] == 255)
    );
}
