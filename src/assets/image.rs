use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::ReelResult;
use crate::motion::curve::cover_size;

/// Opaque RGBA8 pixels of a background already resized to cover the canvas.
#[derive(Clone, Debug)]
pub struct PreparedBackground {
    /// Width in pixels (`>= canvas.width`).
    pub width: u32,
    /// Height in pixels (`>= canvas.height`).
    pub height: u32,
    /// Row-major RGBA8 with alpha flattened to 255.
    pub rgba8: Arc<Vec<u8>>,
}

/// Decode `path` and resize it to cover `canvas`, preserving aspect ratio.
pub fn prepare_background(path: &Path, canvas: Canvas) -> ReelResult<PreparedBackground> {
    let img = image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(prepare_background_from(&img, canvas))
}

/// [`prepare_background`] for an already-decoded image.
pub fn prepare_background_from(img: &image::DynamicImage, canvas: Canvas) -> PreparedBackground {
    let (w, h) = cover_size(img.width(), img.height(), canvas);
    let resized = img.resize_exact(w, h, image::imageops::FilterType::Lanczos3);
    let mut rgba8 = resized.to_rgba8().into_raw();
    flatten_over_black_in_place(&mut rgba8);
    PreparedBackground {
        width: w,
        height: h,
        rgba8: Arc::new(rgba8),
    }
}

fn flatten_over_black_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        px[0] = ((u16::from(px[0]) * a + 127) / 255) as u8;
        px[1] = ((u16::from(px[1]) * a + 127) / 255) as u8;
        px[2] = ((u16::from(px[2]) * a + 127) / 255) as u8;
        px[3] = 255;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image.rs"]
mod tests;
