use crate::foundation::core::Canvas;

/// One composed output frame.
///
/// Pixels are row-major RGBA8 with alpha always 255, so they are valid as both straight and
/// premultiplied data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// A frame of `canvas` size filled with one opaque color.
    pub fn filled(canvas: Canvas, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(canvas.rgba_len());
        for _ in 0..(canvas.width as usize * canvas.height as usize) {
            data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}
