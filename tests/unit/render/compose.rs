use super::*;
use std::sync::Arc;

fn pool() -> rayon::ThreadPool {
    build_pool(Some(2)).unwrap()
}

fn gradient(canvas: Canvas) -> PreparedBackground {
    let mut rgba8 = Vec::with_capacity(canvas.rgba_len());
    for y in 0..canvas.height {
        for x in 0..canvas.width {
            rgba8.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, 7, 255]);
        }
    }
    PreparedBackground {
        width: canvas.width,
        height: canvas.height,
        rgba8: Arc::new(rgba8),
    }
}

#[test]
fn flat_background_fills_every_pixel() {
    let canvas = Canvas::new(8, 6).unwrap();
    let layers = FrameLayers {
        background: BackgroundLayer::Flat([50, 50, 50]),
        overlay_alpha: 0,
        caption: None,
    };
    let frame = compose_frame(canvas, &layers, &pool());
    assert_eq!(frame.data.len(), canvas.rgba_len());
    assert!(frame.data.chunks_exact(4).all(|px| px == [50, 50, 50, 255]));
}

#[test]
fn overlay_darkens_background() {
    let canvas = Canvas::new(4, 4).unwrap();
    let layers = FrameLayers {
        background: BackgroundLayer::Flat([200, 100, 0]),
        overlay_alpha: 102,
        caption: None,
    };
    let frame = compose_frame(canvas, &layers, &pool());
    assert_eq!(frame.pixel(1, 1), [120, 60, 0, 255]);
}

#[test]
fn unzoomed_image_maps_pixels_one_to_one() {
    let canvas = Canvas::new(10, 8).unwrap();
    let source = gradient(canvas);
    let layers = FrameLayers {
        background: BackgroundLayer::Image {
            source: &source,
            curve: MotionCurve {
                zoom_factor: 0.1,
                duration_secs: 5.0,
            },
            local_secs: 0.0,
        },
        overlay_alpha: 0,
        caption: None,
    };
    let frame = compose_frame(canvas, &layers, &pool());
    assert_eq!(frame.data, *source.rgba8);
}

#[test]
fn zoom_keeps_center_and_pulls_edges_inward() {
    let canvas = Canvas::new(10, 8).unwrap();
    let source = gradient(canvas);
    let curve = MotionCurve {
        zoom_factor: 1.0,
        duration_secs: 2.0,
    };
    let layers = FrameLayers {
        background: BackgroundLayer::Image {
            source: &source,
            curve,
            local_secs: 2.0,
        },
        overlay_alpha: 0,
        caption: None,
    };
    let frame = compose_frame(canvas, &layers, &pool());
    // Scale 2: the left edge now samples from a quarter of the way in.
    assert!(frame.pixel(0, 4)[0] > source.rgba8[4 * 10 * 4]);
    assert!(frame.pixel(9, 4)[0] < source.rgba8[(4 * 10 + 9) * 4]);
}

#[test]
fn caption_rows_blend_over_background() {
    let canvas = Canvas::new(4, 6).unwrap();
    let mut rgba8_premul = vec![0u8; 4 * 2 * 4];
    rgba8_premul[..4].copy_from_slice(&[255, 255, 255, 255]);
    rgba8_premul[4..8].copy_from_slice(&[0, 0, 0, 128]);
    let caption = CaptionPixels {
        top: 3,
        width: 4,
        height: 2,
        rgba8_premul,
    };
    let layers = FrameLayers {
        background: BackgroundLayer::Flat([100, 100, 100]),
        overlay_alpha: 0,
        caption: Some(CaptionLayer {
            pixels: &caption,
            opacity: 255,
        }),
    };
    let frame = compose_frame(canvas, &layers, &pool());
    assert_eq!(frame.pixel(0, 3), [255, 255, 255, 255]);
    assert_eq!(frame.pixel(1, 3), [50, 50, 50, 255]);
    assert_eq!(frame.pixel(0, 2), [100, 100, 100, 255]);
    assert_eq!(frame.pixel(0, 5), [100, 100, 100, 255]);
}

#[test]
fn zero_threads_is_rejected() {
    assert!(build_pool(Some(0)).is_err());
}

#[test]
fn caption_opacity_scales_the_blend() {
    let canvas = Canvas::new(2, 2).unwrap();
    let caption = CaptionPixels {
        top: 0,
        width: 2,
        height: 2,
        rgba8_premul: vec![255u8; 2 * 2 * 4],
    };
    let layers = FrameLayers {
        background: BackgroundLayer::Flat([50, 50, 50]),
        overlay_alpha: 0,
        caption: Some(CaptionLayer {
            pixels: &caption,
            opacity: 128,
        }),
    };
    let frame = compose_frame(canvas, &layers, &pool());
    assert_eq!(frame.pixel(0, 0), [153, 153, 153, 255]);

    let hidden = FrameLayers {
        caption: Some(CaptionLayer {
            pixels: &caption,
            opacity: 0,
        }),
        ..layers
    };
    assert_eq!(compose_frame(canvas, &hidden, &pool()).pixel(1, 1), [50, 50, 50, 255]);
}
