use crate::assets::image::{PreparedBackground, prepare_background};
use crate::caption::raster::{CaptionAsset, CaptionPixels, load_caption_pixels};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::motion::curve::motion;
use crate::render::compose::{
    BackgroundLayer, CaptionLayer, FrameLayers, build_pool, compose_frame,
};
use crate::timeline::allocator::ImageSegment;

/// Lifecycle of one render job.
///
/// The render loop moves `Building -> Encoding`; the artifact validator owns the final
/// `Validated`/`Failed` transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderState {
    /// Layers are being assembled.
    Building,
    /// Frames are being written to the sink.
    Encoding,
    /// The artifact passed its post-condition check.
    Validated,
    /// Every attempt failed; terminal.
    Failed,
}

/// Everything needed to produce the visual stream of one job.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Exact output duration in seconds.
    pub total_secs: f64,
    /// Background segments in start-time order.
    pub segments: Vec<ImageSegment>,
    /// Caption assets in start-time order.
    pub captions: Vec<CaptionAsset>,
    /// Caption fade-in and fade-out length in seconds.
    pub caption_fade_secs: f64,
    /// Darkening overlay alpha.
    pub overlay_alpha: u8,
    /// Color used for segments without a usable image.
    pub fallback_rgb: [u8; 3],
    /// Mixed audio handed to the sink, if any.
    pub audio: Option<AudioInputConfig>,
}

impl RenderPlan {
    /// Number of output frames.
    pub fn frame_count(&self) -> u64 {
        self.fps.frames_for_secs(self.total_secs)
    }

    fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            width: self.canvas.width,
            height: self.canvas.height,
            fps: self.fps,
            duration_secs: self.total_secs,
            audio: self.audio.clone(),
        }
    }
}

/// Render every frame of `plan` into `sink`, in timeline order.
///
/// Backgrounds and caption pixels are loaded when their segment or chunk becomes active, so at
/// most one of each is resident. Encoder failures propagate unchanged.
#[tracing::instrument(skip_all, fields(frames = plan.frame_count(), w = plan.canvas.width, h = plan.canvas.height))]
pub fn render_plan(plan: &RenderPlan, sink: &mut dyn FrameSink, threads: Option<usize>) -> ReelResult<()> {
    tracing::info!(state = ?RenderState::Building, "render state");
    plan.canvas.validate()?;
    if plan.total_secs.is_nan() || plan.total_secs <= 0.0 {
        return Err(ReelError::validation("render duration must be > 0"));
    }
    if plan.segments.is_empty() {
        return Err(ReelError::validation("render plan has no background segments"));
    }
    debug_assert!(
        plan.segments
            .windows(2)
            .all(|w| w[0].start_secs < w[1].start_secs),
        "segments must be in strictly increasing start order"
    );
    debug_assert!(
        plan.captions
            .windows(2)
            .all(|w| w[0].start_secs < w[1].start_secs),
        "captions must be in strictly increasing start order"
    );

    let pool = build_pool(threads)?;
    let mut backgrounds = BackgroundCursor::new(plan);
    let mut captions = CaptionCursor::new(&plan.captions, plan.caption_fade_secs);

    tracing::info!(state = ?RenderState::Encoding, "render state");
    sink.begin(plan.sink_config())?;
    for i in 0..plan.frame_count() {
        let idx = FrameIndex(i);
        let t = plan.fps.frame_time_secs(idx);
        let (segment, source) = backgrounds.at(t);
        let background = match source {
            Some(source) => BackgroundLayer::Image {
                source,
                curve: motion(segment),
                local_secs: t - segment.start_secs,
            },
            None => BackgroundLayer::Flat(plan.fallback_rgb),
        };
        let layers = FrameLayers {
            background,
            overlay_alpha: plan.overlay_alpha,
            caption: captions.at(t)?,
        };
        let frame = compose_frame(plan.canvas, &layers, &pool);
        sink.push_frame(idx, &frame)?;
    }
    sink.end()
}

struct BackgroundCursor<'a> {
    plan: &'a RenderPlan,
    index: usize,
    loaded: Option<(usize, Option<PreparedBackground>)>,
}

impl<'a> BackgroundCursor<'a> {
    fn new(plan: &'a RenderPlan) -> Self {
        Self {
            plan,
            index: 0,
            loaded: None,
        }
    }

    fn at(&mut self, t: f64) -> (&'a ImageSegment, Option<&PreparedBackground>) {
        let plan: &'a RenderPlan = self.plan;
        let segments = &plan.segments;
        while self.index + 1 < segments.len() && t >= segments[self.index].end_secs() {
            self.index += 1;
        }
        let segment = &segments[self.index];
        if self.loaded.as_ref().map(|(i, _)| *i) != Some(self.index) {
            // Drop the previous background before decoding the next one.
            self.loaded = None;
            let prepared = segment.image.as_deref().and_then(|path| {
                match prepare_background(path, plan.canvas) {
                    Ok(bg) => Some(bg),
                    Err(e) => {
                        tracing::warn!(
                            image = %path.display(),
                            error = %e,
                            "background image unusable; using fallback color"
                        );
                        None
                    }
                }
            });
            self.loaded = Some((self.index, prepared));
        }
        let source = self.loaded.as_ref().and_then(|(_, bg)| bg.as_ref());
        (segment, source)
    }
}

struct CaptionCursor<'a> {
    captions: &'a [CaptionAsset],
    fade_secs: f64,
    index: usize,
    loaded: Option<(usize, CaptionPixels)>,
}

impl<'a> CaptionCursor<'a> {
    fn new(captions: &'a [CaptionAsset], fade_secs: f64) -> Self {
        Self {
            captions,
            fade_secs,
            index: 0,
            loaded: None,
        }
    }

    fn at(&mut self, t: f64) -> ReelResult<Option<CaptionLayer<'_>>> {
        while self.index < self.captions.len() && t >= self.captions[self.index].end_secs {
            self.index += 1;
        }
        let Some(asset) = self.captions.get(self.index) else {
            self.loaded = None;
            return Ok(None);
        };
        if t < asset.start_secs {
            return Ok(None);
        }
        if self.loaded.as_ref().map(|(i, _)| *i) != Some(self.index) {
            self.loaded = Some((self.index, load_caption_pixels(asset)?));
        }
        let opacity = fade_opacity(t - asset.start_secs, asset.end_secs - t, self.fade_secs);
        Ok(self
            .loaded
            .as_ref()
            .map(|(_, pixels)| CaptionLayer { pixels, opacity }))
    }
}

/// Linear fade-in over the first `fade_secs` of a caption and fade-out over its last.
pub(crate) fn fade_opacity(since_start: f64, until_end: f64, fade_secs: f64) -> u8 {
    if !(fade_secs > 0.0) {
        return 255;
    }
    let ramp = (since_start / fade_secs)
        .min(until_end / fade_secs)
        .clamp(0.0, 1.0);
    (ramp * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
