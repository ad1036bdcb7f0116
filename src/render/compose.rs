use rayon::prelude::*;

use crate::assets::image::PreparedBackground;
use crate::caption::raster::CaptionPixels;
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{blend_premul_over_opaque, darken_opaque, mul_div255_u16};
use crate::motion::curve::MotionCurve;
use crate::render::frame::FrameRGBA;

/// Background layer for one frame.
#[derive(Clone, Copy, Debug)]
pub enum BackgroundLayer<'a> {
    /// A pre-scaled image zoomed along `curve` at segment-local time `local_secs`.
    Image {
        /// Cover-scaled source pixels.
        source: &'a PreparedBackground,
        /// Zoom curve of the segment.
        curve: MotionCurve,
        /// Seconds since the segment start.
        local_secs: f64,
    },
    /// Flat fallback color for a missing image.
    Flat([u8; 3]),
}

/// A caption drawn at `opacity` (255 is fully opaque).
#[derive(Clone, Copy, Debug)]
pub struct CaptionLayer<'a> {
    /// Premultiplied caption pixels.
    pub pixels: &'a CaptionPixels,
    /// Fade multiplier applied to the caption.
    pub opacity: u8,
}

/// Layers of one frame, listed bottom to top.
#[derive(Clone, Copy, Debug)]
pub struct FrameLayers<'a> {
    /// Background motion layer.
    pub background: BackgroundLayer<'a>,
    /// Darkening overlay alpha (0 disables it).
    pub overlay_alpha: u8,
    /// Caption visible in this frame, if any.
    pub caption: Option<CaptionLayer<'a>>,
}

/// Compose one frame on `pool`, splitting the work by rows.
pub fn compose_frame(canvas: Canvas, layers: &FrameLayers<'_>, pool: &rayon::ThreadPool) -> FrameRGBA {
    let width = canvas.width as usize;
    let mut data = vec![0u8; canvas.rgba_len()];
    let sampler = match layers.background {
        BackgroundLayer::Image {
            source,
            curve,
            local_secs,
        } => Some((
            source,
            curve.canvas_to_source(local_secs, source.width, source.height, canvas),
        )),
        BackgroundLayer::Flat(_) => None,
    };
    let flat = match layers.background {
        BackgroundLayer::Flat(rgb) => rgb,
        BackgroundLayer::Image { .. } => [0, 0, 0],
    };

    pool.install(|| {
        data.par_chunks_mut(width * 4)
            .enumerate()
            .for_each(|(y, row)| {
                match sampler {
                    Some((source, xf)) => sample_row(row, y, source, xf),
                    None => {
                        for px in row.chunks_exact_mut(4) {
                            px.copy_from_slice(&[flat[0], flat[1], flat[2], 255]);
                        }
                    }
                }
                if layers.overlay_alpha > 0 {
                    for px in row.chunks_exact_mut(4) {
                        darken_opaque(px, layers.overlay_alpha);
                    }
                }
                if let Some(caption) = layers.caption
                    && caption.opacity > 0
                {
                    blend_caption_row(row, y, caption.pixels, caption.opacity);
                }
            });
    });

    FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
    }
}

fn sample_row(row: &mut [u8], y: usize, source: &PreparedBackground, canvas_to_src: Affine) {
    let [a, b, c, d, e, f] = canvas_to_src.as_coeffs();
    let cy = y as f64 + 0.5;
    for (x, px) in row.chunks_exact_mut(4).enumerate() {
        let cx = x as f64 + 0.5;
        let sx = a * cx + c * cy + e;
        let sy = b * cx + d * cy + f;
        let rgb = bilinear(source, sx - 0.5, sy - 0.5);
        px.copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
}

fn bilinear(source: &PreparedBackground, x: f64, y: f64) -> [u8; 3] {
    let max_x = f64::from(source.width - 1);
    let max_y = f64::from(source.height - 1);
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(source.width as usize - 1);
    let y1 = (y0 + 1).min(source.height as usize - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let stride = source.width as usize * 4;
    let px = |xx: usize, yy: usize, ch: usize| f64::from(source.rgba8[yy * stride + xx * 4 + ch]);
    let mut out = [0u8; 3];
    for (ch, o) in out.iter_mut().enumerate() {
        let top = px(x0, y0, ch) * (1.0 - fx) + px(x1, y0, ch) * fx;
        let bottom = px(x0, y1, ch) * (1.0 - fx) + px(x1, y1, ch) * fx;
        *o = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

fn blend_caption_row(row: &mut [u8], y: usize, caption: &CaptionPixels, opacity: u8) {
    let top = caption.top as usize;
    if y < top || y >= top + caption.height as usize {
        return;
    }
    let cap_stride = caption.width as usize * 4;
    let start = (y - top) * cap_stride;
    let cap_row = &caption.rgba8_premul[start..start + cap_stride];
    if opacity == 255 {
        for (dst, src) in row.chunks_exact_mut(4).zip(cap_row.chunks_exact(4)) {
            blend_premul_over_opaque(dst, src);
        }
        return;
    }
    let op = u16::from(opacity);
    for (dst, src) in row.chunks_exact_mut(4).zip(cap_row.chunks_exact(4)) {
        let faded = [
            mul_div255_u16(u16::from(src[0]), op) as u8,
            mul_div255_u16(u16::from(src[1]), op) as u8,
            mul_div255_u16(u16::from(src[2]), op) as u8,
            mul_div255_u16(u16::from(src[3]), op) as u8,
        ];
        blend_premul_over_opaque(dst, &faded);
    }
}

/// Build the worker pool used for row-parallel compositing.
pub fn build_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(ReelError::validation(
            "threads must be >= 1 when provided",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
