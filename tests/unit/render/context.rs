use super::*;

fn checker(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| image::Rgba([x as u8, y as u8, 0, 255]))
}

#[test]
fn region_inside_extent_is_cropped() {
    let mut ctx = CpuContext::default();
    let img = checker(10, 8);
    let out = ctx
        .create_still_image(&img, Rect::new(2.0, 3.0, 6.0, 8.0))
        .unwrap();
    assert_eq!(out.dimensions(), (4, 5));
    assert_eq!(out.get_pixel(0, 0).0, [2, 3, 0, 255]);
    assert_eq!(ctx.stats().images, 1);
}

#[test]
fn region_is_clipped_to_extent() {
    let mut ctx = CpuContext::default();
    let img = checker(10, 10);
    let out = ctx
        .create_still_image(&img, Rect::new(-5.0, -5.0, 5.0, 5.0))
        .unwrap();
    assert_eq!(out.dimensions(), (5, 5));
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn disjoint_or_empty_region_yields_nothing() {
    let mut ctx = CpuContext::default();
    let img = checker(4, 4);
    assert!(
        ctx.create_still_image(&img, Rect::new(10.0, 10.0, 20.0, 20.0))
            .is_none()
    );
    assert!(ctx.create_still_image(&img, Rect::ZERO).is_none());
    assert_eq!(ctx.stats().images, 0);
}

#[test]
fn clear_color_fills_transparent_pixels() {
    let mut ctx = CpuContext::new(CpuContextOpts::default().with_clear_rgba(Some([9, 9, 9, 255])));
    let img = RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 0]));
    let out = ctx
        .create_still_image(&img, Rect::new(0.0, 0.0, 2.0, 2.0))
        .unwrap();
    assert_eq!(out.get_pixel(1, 1).0, [9, 9, 9, 255]);
}

#[test]
fn corner_radius_of_drawn_node_masks_corners() {
    let mut ctx = CpuContext::default();
    let mut node = ScreenNode::new();
    node.set_corner_radius(4.0);
    ctx.on_draw(&node);

    let img = RgbaImage::from_pixel(16, 16, image::Rgba([255, 0, 0, 255]));
    let out = ctx
        .create_still_image(&img, Rect::new(0.0, 0.0, 16.0, 16.0))
        .unwrap();
    assert_eq!(out.get_pixel(0, 0).0[3], 0);
    assert_eq!(out.get_pixel(15, 15).0[3], 0);
    assert_eq!(out.get_pixel(8, 8).0[3], 255);
    assert_eq!(out.get_pixel(8, 0).0[3], 255);
    assert_eq!(ctx.take_stats().draws, 1);
    assert_eq!(ctx.stats(), RenderStats::default());
}
