use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Affine, Point, Vec2};

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Timeline time in seconds at the start of frame `idx`.
    pub fn frame_time_secs(self, idx: FrameIndex) -> f64 {
        (idx.0 as f64) * f64::from(self.den) / f64::from(self.num)
    }

    /// Number of frames needed to cover `secs`, rounded to the nearest frame (at least one).
    pub fn frames_for_secs(self, secs: f64) -> u64 {
        ((secs * self.as_f64()).round().max(1.0)) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 24, den: 1 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas.
    ///
    /// Both dimensions must be non-zero and even (yuv420p output).
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Check the yuv420p constraints on an already-built canvas.
    pub fn validate(self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "canvas width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }

    /// Canvas center in pixel coordinates.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Byte length of one RGBA8 frame at this size.
    pub fn rgba_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
