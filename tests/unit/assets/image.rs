use super::*;

#[test]
fn prepared_background_covers_canvas() {
    let canvas = Canvas::new(64, 36).unwrap();
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        20,
        20,
        image::Rgb([200, 10, 10]),
    ));
    let bg = prepare_background_from(&img, canvas);
    assert_eq!((bg.width, bg.height), (64, 64));
    assert_eq!(bg.rgba8.len(), 64 * 64 * 4);
    assert!(bg.rgba8.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn transparent_pixels_flatten_to_black() {
    let canvas = Canvas::new(2, 2).unwrap();
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        2,
        2,
        image::Rgba([255, 255, 255, 0]),
    ));
    let bg = prepare_background_from(&img, canvas);
    assert_eq!(&bg.rgba8[..4], &[0, 0, 0, 255]);
}

#[test]
fn missing_file_is_an_error() {
    let canvas = Canvas::new(2, 2).unwrap();
    assert!(prepare_background(Path::new("/no/such/image.png"), canvas).is_err());
}
