//! Compositor configuration and the two built-in production formats.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Built-in output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Vertical short-form video: fast motion, small caption chunks.
    Shorts,
    /// Horizontal long-form video: slow motion, paragraph-sized captions.
    Longform,
}

impl Format {
    /// Default output canvas for this format.
    pub fn canvas(self) -> Canvas {
        match self {
            Self::Shorts => Canvas {
                width: 1080,
                height: 1920,
            },
            Self::Longform => Canvas {
                width: 1920,
                height: 1080,
            },
        }
    }

    /// Default upper bound on the output duration, in seconds.
    pub fn max_total_secs(self) -> f64 {
        match self {
            Self::Shorts => 60.0,
            Self::Longform => 900.0,
        }
    }
}

/// What to do with caption words that fall past the end of the timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionOverflow {
    /// Silently drop the trailing words.
    #[default]
    Drop,
    /// Append the trailing words to the last emitted caption.
    MergeIntoLast,
}

/// Per-job compositor options.
///
/// Every field has a default, so a JSON file only needs to name the options it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Output frame rate.
    pub fps: Fps,
    /// Nominal on-screen time of every background image except the last.
    pub per_image_cap_secs: f64,
    /// Words per caption chunk.
    pub caption_chunk_words: usize,
    /// Caption duration multiplier over the pure words-per-second rate.
    pub caption_pacing: f64,
    /// Minimum on-screen time of a caption.
    pub min_caption_secs: f64,
    /// Trailing-word policy for captions.
    pub caption_overflow: CaptionOverflow,
    /// Caption font size in pixels.
    pub caption_font_size: f32,
    /// Vertical center of the caption block as a fraction of the canvas height.
    pub caption_anchor_y: f32,
    /// Caption fade-in and fade-out length in seconds (0 disables fading).
    pub caption_fade_secs: f64,
    /// Total scale gained by a background over its segment (`scale(end) = 1 + zoom_factor`).
    pub zoom_factor: f64,
    /// Optional looping ambient audio bed.
    pub ambient_bed_path: Option<PathBuf>,
    /// Linear gain applied to the ambient bed.
    pub ambient_gain: f32,
    /// Opacity of the black darkening overlay (0..=1).
    pub overlay_opacity: f32,
    /// Fill color for segments without a usable image.
    pub fallback_rgb: [u8; 3],
    /// Smallest output file accepted by the artifact validator.
    pub min_output_bytes: u64,
    /// Worker threads for frame composition and encoding. `None` uses all cores.
    pub threads: Option<usize>,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self::for_format(Format::Shorts)
    }
}

impl CompositorConfig {
    /// Defaults tuned for `format`.
    pub fn for_format(format: Format) -> Self {
        let base = Self {
            fps: Fps::default(),
            per_image_cap_secs: 6.0,
            caption_chunk_words: 4,
            caption_pacing: 1.1,
            min_caption_secs: 1.5,
            caption_overflow: CaptionOverflow::Drop,
            caption_font_size: 70.0,
            caption_anchor_y: 0.5,
            caption_fade_secs: 0.3,
            zoom_factor: 0.1,
            ambient_bed_path: None,
            ambient_gain: 0.15,
            overlay_opacity: 0.4,
            fallback_rgb: [50, 50, 50],
            min_output_bytes: 1024,
            threads: None,
        };
        match format {
            Format::Shorts => base,
            Format::Longform => Self {
                per_image_cap_secs: 100.0,
                caption_chunk_words: 50,
                caption_pacing: 1.0,
                caption_font_size: 50.0,
                caption_anchor_y: 0.8,
                zoom_factor: 0.05,
                fallback_rgb: [30, 30, 30],
                ..base
            },
        }
    }

    /// Load a JSON config file. Missing fields take the Shorts defaults.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        Self::from_path_over(&Self::default(), path)
    }

    /// Load a JSON config file whose fields override `base`.
    pub fn from_path_over(base: &Self, path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str_over(base, &text)
    }

    /// Parse a JSON config string over the Shorts defaults.
    pub fn from_json_str(text: &str) -> ReelResult<Self> {
        Self::from_json_str_over(&Self::default(), text)
    }

    /// Parse a JSON object and apply its fields on top of `base`.
    ///
    /// Fields the object does not name keep `base`'s values, so a partial file tweaks a preset
    /// instead of replacing it.
    pub fn from_json_str_over(base: &Self, text: &str) -> ReelResult<Self> {
        let overrides: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| ReelError::validation(format!("config json: {e}")))?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(ReelError::validation("config json must be an object"));
        };
        let mut merged = match serde_json::to_value(base)
            .map_err(|e| ReelError::validation(format!("config json: {e}")))?
        {
            serde_json::Value::Object(map) => map,
            _ => return Err(ReelError::validation("config must serialize to an object")),
        };
        merged.extend(overrides);

        let cfg: Self = serde_json::from_value(serde_json::Value::Object(merged))
            .map_err(|e| ReelError::validation(format!("config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations that would make the timeline math meaningless.
    pub fn validate(&self) -> ReelResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if !(self.per_image_cap_secs.is_finite() && self.per_image_cap_secs > 0.0) {
            return Err(ReelError::validation("per_image_cap_secs must be > 0"));
        }
        if self.caption_chunk_words == 0 {
            return Err(ReelError::validation("caption_chunk_words must be >= 1"));
        }
        if !(self.caption_pacing.is_finite() && self.caption_pacing > 0.0) {
            return Err(ReelError::validation("caption_pacing must be > 0"));
        }
        if !(self.min_caption_secs.is_finite() && self.min_caption_secs >= 0.0) {
            return Err(ReelError::validation("min_caption_secs must be >= 0"));
        }
        if !(self.caption_font_size.is_finite() && self.caption_font_size > 0.0) {
            return Err(ReelError::validation("caption_font_size must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.caption_anchor_y) {
            return Err(ReelError::validation("caption_anchor_y must be within 0..=1"));
        }
        if !(self.zoom_factor.is_finite() && self.zoom_factor >= 0.0) {
            return Err(ReelError::validation("zoom_factor must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.ambient_gain) {
            return Err(ReelError::validation("ambient_gain must be within 0..=1"));
        }
        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(ReelError::validation("overlay_opacity must be within 0..=1"));
        }
        if !(self.caption_fade_secs.is_finite() && self.caption_fade_secs >= 0.0) {
            return Err(ReelError::validation("caption_fade_secs must be >= 0"));
        }
        if self.threads == Some(0) {
            return Err(ReelError::validation("threads must be >= 1 when set"));
        }
        Ok(())
    }

    /// Overlay opacity as an 8-bit alpha.
    pub(crate) fn overlay_alpha(&self) -> u8 {
        (self.overlay_opacity.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
