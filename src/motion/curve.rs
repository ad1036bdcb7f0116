use crate::foundation::core::{Affine, Canvas, Vec2};
use crate::timeline::allocator::ImageSegment;

/// Linear zoom curve over one background segment.
///
/// `scale(t) = 1 + zoom_factor * (t / duration)`, with `t` clamped into `[0, duration]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionCurve {
    /// Scale gained between segment start and end.
    pub zoom_factor: f64,
    /// Segment duration in seconds.
    pub duration_secs: f64,
}

/// Build the motion curve for `segment`.
pub fn motion(segment: &ImageSegment) -> MotionCurve {
    MotionCurve {
        zoom_factor: segment.zoom_factor,
        duration_secs: segment.duration_secs,
    }
}

impl MotionCurve {
    /// Scale factor at segment-local time `local_secs`.
    pub fn scale_at(&self, local_secs: f64) -> f64 {
        if !(self.duration_secs > 0.0) {
            return 1.0;
        }
        let t = local_secs.clamp(0.0, self.duration_secs);
        1.0 + self.zoom_factor * (t / self.duration_secs)
    }

    /// Map output canvas pixels to source pixels at `local_secs`.
    ///
    /// `src_w`/`src_h` are the dimensions of the source already scaled to cover the canvas; the
    /// mapping keeps both centers aligned, so a scale `>= 1` never samples outside the source.
    pub fn canvas_to_source(&self, local_secs: f64, src_w: u32, src_h: u32, canvas: Canvas) -> Affine {
        let s = self.scale_at(local_secs);
        let src_center = Vec2::new(f64::from(src_w) / 2.0, f64::from(src_h) / 2.0);
        let canvas_center = canvas.center().to_vec2();
        Affine::translate(src_center) * Affine::scale(1.0 / s) * Affine::translate(-canvas_center)
    }
}

/// Dimensions an image must be resized to so that it covers `canvas` without letterboxing.
pub fn cover_size(img_w: u32, img_h: u32, canvas: Canvas) -> (u32, u32) {
    if img_w == 0 || img_h == 0 {
        return (canvas.width, canvas.height);
    }
    let sx = f64::from(canvas.width) / f64::from(img_w);
    let sy = f64::from(canvas.height) / f64::from(img_h);
    let s = sx.max(sy);
    let w = ((f64::from(img_w) * s).ceil() as u32).max(canvas.width);
    let h = ((f64::from(img_h) * s).ceil() as u32).max(canvas.height);
    (w, h)
}

#[cfg(test)]
#[path = "../../tests/unit/motion/curve.rs"]
mod tests;
