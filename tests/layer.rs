use cairo::{Context, Format, ImageSurface};
use rasterlayer::layer::{LayerError, PixelBuffer, RasterLayer};
use rasterlayer::viewer::{MouseButton, ScrollDirection};
use rasterlayer::{Config, Viewer};

const RED: u32 = 0xFFFF_0000;
const BLUE: u32 = 0xFF00_00FF;

/// Red left half, blue right half.
fn split_buffer(width: i32, height: i32) -> PixelBuffer {
    let surface = ImageSurface::create(Format::ARgb32, width, height).unwrap();
    let ctx = Context::new(&surface).unwrap();
    ctx.set_source_rgb(1.0, 0.0, 0.0);
    ctx.rectangle(0.0, 0.0, width as f64 / 2.0, height as f64);
    ctx.fill().unwrap();
    ctx.set_source_rgb(0.0, 0.0, 1.0);
    ctx.rectangle(width as f64 / 2.0, 0.0, width as f64 / 2.0, height as f64);
    ctx.fill().unwrap();
    drop(ctx);
    PixelBuffer::from_surface(&surface).unwrap()
}

fn rendered(layer: &RasterLayer) -> PixelBuffer {
    layer.target().unwrap().capture().unwrap()
}

fn loaded_layer(name: &str, buffer: PixelBuffer) -> RasterLayer {
    let mut layer = RasterLayer::new(name);
    layer
        .initialise(buffer.width() as i32, buffer.height() as i32)
        .unwrap();
    layer.set_image_data(buffer).unwrap();
    layer.draw().unwrap();
    layer
}

#[test]
fn zoom_then_pan_shows_the_right_region() {
    let mut layer = loaded_layer("image", split_buffer(40, 40));

    layer.zoom(1.0, 1.0, 0.0, 0.0).unwrap();
    // Zoomed x2 from the corner: only red fits in the frame.
    let frame = rendered(&layer);
    assert_eq!(frame.argb(10, 20), Some(RED));
    assert_eq!(frame.argb(30, 20), Some(RED));

    layer.translate(-20.0, 0.0).unwrap();
    let frame = rendered(&layer);
    assert_eq!(frame.argb(10, 20), Some(RED));
    assert_eq!(frame.argb(30, 20), Some(BLUE));
    assert_eq!(layer.transform().origin(), (-20.0, 0.0));
}

#[test]
fn pan_past_the_edge_is_rejected_and_state_kept() {
    let mut layer = loaded_layer("image", split_buffer(40, 40));
    layer.zoom(1.0, 1.0, 0.0, 0.0).unwrap();
    layer.translate(-20.0, 0.0).unwrap();
    let before = rendered(&layer);

    let err = layer.translate(-30.0, 0.0).unwrap_err();
    assert!(matches!(err, LayerError::TranslateRejected { .. }));
    assert!(err.is_rejection());
    assert_eq!(layer.transform().origin(), (-20.0, 0.0));
    assert_eq!(rendered(&layer), before);
}

#[test]
fn zoom_outside_limits_leaves_view_unchanged() {
    let mut layer = loaded_layer("image", split_buffer(20, 20));
    let before = rendered(&layer);

    let err = layer.zoom(-0.95, -0.95, 10.0, 10.0).unwrap_err();
    assert!(matches!(err, LayerError::ZoomRejected { .. }));
    assert!(layer.transform().is_identity());
    assert_eq!(rendered(&layer), before);
}

#[test]
fn merge_bakes_the_current_view() {
    let mut image = loaded_layer("image", split_buffer(40, 40));
    image.zoom(1.0, 1.0, 0.0, 0.0).unwrap();

    let mut note = RasterLayer::new("note");
    note.initialise(40, 40).unwrap();
    note.set_line_color(rasterlayer::draw::BLUE).unwrap();
    note.fill_context().unwrap();

    image.merge(&mut note).unwrap();

    assert!(image.transform().is_identity());
    assert!(note.image_data().unwrap().is_blank());
    assert!(rendered(&note).is_blank());

    // The annotation covered everything and now lives in the image buffer.
    image.draw().unwrap();
    assert_eq!(image.image_data().unwrap().argb(5, 5), Some(BLUE));
    assert_eq!(rendered(&image).argb(35, 35), Some(BLUE));
}

#[test]
fn merged_zoom_survives_redraw() {
    let mut image = loaded_layer("image", split_buffer(40, 40));
    image.zoom(1.0, 1.0, 0.0, 0.0).unwrap();

    let mut note = RasterLayer::new("note");
    note.initialise(40, 40).unwrap();

    image.merge(&mut note).unwrap();
    image.draw().unwrap();

    // Only the red half was in view when merged.
    let frame = rendered(&image);
    assert_eq!(frame.argb(5, 20), Some(RED));
    assert_eq!(frame.argb(35, 20), Some(RED));
}

#[test]
fn png_round_trip_through_layer() {
    let layer = loaded_layer("image", split_buffer(16, 8));

    let mut encoded = Vec::new();
    rendered(&layer).write_png(&mut encoded).unwrap();
    let decoded = PixelBuffer::from_png(&mut encoded.as_slice()).unwrap();

    assert_eq!(decoded, *layer.image_data().unwrap());
}

#[test]
fn viewer_drag_and_scroll() {
    let mut viewer = Viewer::new(&Config::default());
    viewer.initialise(40, 40).unwrap();
    viewer.load_image(split_buffer(40, 40)).unwrap();

    for _ in 0..10 {
        viewer.on_scroll(ScrollDirection::Up, 0.0, 0.0).unwrap();
    }
    let (zoom_x, zoom_y) = viewer.image().transform().zoom();
    assert!((zoom_x - 2.0).abs() < 1e-9);
    assert!((zoom_y - 2.0).abs() < 1e-9);

    viewer.on_mouse_press(MouseButton::Left, 30.0, 20.0);
    assert!(viewer.is_dragging());
    viewer.on_mouse_motion(10.0, 20.0).unwrap();
    viewer.on_mouse_release(MouseButton::Left);
    assert!(!viewer.is_dragging());

    let (origin_x, _) = viewer.image().transform().origin();
    assert!((origin_x + 20.0).abs() < 1e-9);
    assert_eq!(
        viewer.image().transform(),
        viewer.annotation().transform()
    );

    let frame = viewer.snapshot().unwrap();
    assert_eq!(frame.argb(30, 20), Some(BLUE));
}
