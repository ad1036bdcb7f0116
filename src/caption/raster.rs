use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::caption::chunker::CaptionChunk;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};

/// Caption styling shared by every chunk of one job.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// Vertical center of the caption block as a fraction of the canvas height.
    pub anchor_y: f32,
}

/// A caption rasterized to a PNG in the job scratch directory.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionAsset {
    /// PNG path inside the scratch directory.
    pub path: PathBuf,
    /// Canvas row of the asset's top edge.
    pub top: u32,
    /// Asset width (always the canvas width).
    pub width: u32,
    /// Asset height.
    pub height: u32,
    /// Timeline start in seconds.
    pub start_secs: f64,
    /// Exclusive timeline end in seconds.
    pub end_secs: f64,
}

/// Premultiplied RGBA8 caption pixels, loaded on demand while rendering.
#[derive(Clone, Debug)]
pub struct CaptionPixels {
    /// Canvas row of the top edge.
    pub top: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
}

/// Fraction of the canvas width a caption line may occupy.
const LINE_WIDTH_FRACTION: f32 = 0.8;
/// Rough advance of an average bold glyph relative to the font size.
const GLYPH_ADVANCE_EM: f32 = 0.55;
const LINE_HEIGHT_EM: f32 = 1.25;

/// System font database shared by all captions of a job.
pub fn caption_fontdb() -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
}

/// Rasterize every chunk into `scratch_dir`, returning the assets in timeline order.
pub fn rasterize_captions(
    chunks: &[CaptionChunk],
    canvas: Canvas,
    style: CaptionStyle,
    scratch_dir: &Path,
) -> ReelResult<Vec<CaptionAsset>> {
    if chunks.is_empty() {
        return Ok(Vec::new());
    }
    let fontdb = caption_fontdb();
    if fontdb.len() == 0 {
        tracing::warn!("no system fonts found; captions will render blank");
    }

    let mut assets = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let path = scratch_dir.join(format!("caption_{i:04}.png"));
        let asset = rasterize_caption(chunk, canvas, style, &fontdb, &path)?;
        assets.push(asset);
    }
    Ok(assets)
}

fn rasterize_caption(
    chunk: &CaptionChunk,
    canvas: Canvas,
    style: CaptionStyle,
    fontdb: &Arc<usvg::fontdb::Database>,
    out_path: &Path,
) -> ReelResult<CaptionAsset> {
    let lines = wrap_words(&chunk.text, max_chars_per_line(canvas, style.font_size));
    let line_h = style.font_size * LINE_HEIGHT_EM;
    let pad = (style.font_size * 0.5).ceil();
    let height = ((lines.len() as f32) * line_h + 2.0 * pad).ceil().max(1.0) as u32;
    let height = height.min(canvas.height);

    let center = (canvas.height as f32) * style.anchor_y.clamp(0.0, 1.0);
    let top = (center - (height as f32) / 2.0)
        .round()
        .clamp(0.0, (canvas.height - height) as f32) as u32;

    let svg = caption_svg(&lines, canvas.width, height, style.font_size, pad);
    let opts = usvg::Options {
        fontdb: fontdb.clone(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse caption svg")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, height)
        .ok_or_else(|| ReelError::validation("failed to allocate caption pixmap"))?;
    resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    let straight = unpremultiply(pixmap.data());
    image::save_buffer_with_format(
        out_path,
        &straight,
        canvas.width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write caption png '{}'", out_path.display()))?;

    Ok(CaptionAsset {
        path: out_path.to_path_buf(),
        top,
        width: canvas.width,
        height,
        start_secs: chunk.start_secs,
        end_secs: chunk.end_secs(),
    })
}

/// Load a caption PNG back as premultiplied pixels.
pub fn load_caption_pixels(asset: &CaptionAsset) -> ReelResult<CaptionPixels> {
    let img = image::open(&asset.path)
        .with_context(|| format!("read caption png '{}'", asset.path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    let mut rgba8_premul = img.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Ok(CaptionPixels {
        top: asset.top,
        width,
        height,
        rgba8_premul,
    })
}

fn max_chars_per_line(canvas: Canvas, font_size: f32) -> usize {
    let usable = (canvas.width as f32) * LINE_WIDTH_FRACTION;
    ((usable / (font_size * GLYPH_ADVANCE_EM)).floor() as usize).max(1)
}

/// Greedy word wrap by character count. Words longer than a line stay on their own line.
pub(crate) fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::<String>::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn caption_svg(lines: &[String], width: u32, height: u32, font_size: f32, pad: f32) -> String {
    let line_h = font_size * LINE_HEIGHT_EM;
    let cx = (width as f32) / 2.0;
    let stroke = (font_size / 16.0).max(1.0);

    let mut spans = String::new();
    for (i, line) in lines.iter().enumerate() {
        let y = pad + font_size + (i as f32) * line_h;
        spans.push_str(&format!(
            r#"<tspan x="{cx}" y="{y}">{}</tspan>"#,
            escape_xml(line)
        ));
    }

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<text font-family="DejaVu Sans, Arial, sans-serif" font-size="{fs}" font-weight="bold" "#,
            r#"fill="white" stroke="black" stroke-width="{sw}" paint-order="stroke" text-anchor="middle">"#,
            "{spans}</text></svg>"
        ),
        w = width,
        h = height,
        fs = font_size,
        sw = stroke,
        spans = spans,
    )
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn unpremultiply(premul: &[u8]) -> Vec<u8> {
    let mut out = premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/raster.rs"]
mod tests;
