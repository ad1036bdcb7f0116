use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(24, 0).is_err());
}

#[test]
fn fps_frame_time_and_count() {
    let fps = Fps::new(24, 1).unwrap();
    assert_eq!(fps.frame_time_secs(FrameIndex(0)), 0.0);
    assert!((fps.frame_time_secs(FrameIndex(12)) - 0.5).abs() < 1e-12);
    assert_eq!(fps.frames_for_secs(8.0), 192);
    assert_eq!(fps.frames_for_secs(0.001), 1);
}

#[test]
fn canvas_requires_even_nonzero_dims() {
    assert!(Canvas::new(1080, 1920).is_ok());
    assert!(Canvas::new(0, 1920).is_err());
    assert!(Canvas::new(1081, 1920).is_err());
}

#[test]
fn canvas_center_and_len() {
    let c = Canvas::new(64, 36).unwrap();
    assert_eq!(c.center(), Point::new(32.0, 18.0));
    assert_eq!(c.rgba_len(), 64 * 36 * 4);
}
