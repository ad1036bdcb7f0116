use std::path::PathBuf;

use crate::assets::media::{load_ambient, load_narration};
use crate::audio::mix::{AudioTrack, mix_tracks, write_f32le_file};
use crate::caption::chunker::{CaptionChunk, ChunkOpts, chunk_captions};
use crate::caption::raster::{CaptionStyle, rasterize_captions};
use crate::config::CompositorConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::encode::profile::{EncoderCapability, EncoderProfile};
use crate::encode::sink::{AudioInputConfig, FrameSink};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::pipeline::{RenderPlan, render_plan};
use crate::session::scratch::ScratchDir;
use crate::timeline::allocator::{ImageSegment, allocate_segments};
use crate::validate::artifact::{RenderResult, validate_and_retry};

/// Immutable input to one render job.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderRequest {
    /// Narration audio; its duration drives every timing computation.
    pub narration_audio_path: PathBuf,
    /// Plain script text, split on whitespace.
    pub script_text: String,
    /// Background images in display order. Entries may be missing.
    pub image_paths: Vec<PathBuf>,
    /// Output canvas.
    pub canvas: Canvas,
    /// Upper bound on the output duration in seconds.
    pub max_total_secs: f64,
    /// Output video path.
    pub output_path: PathBuf,
    /// Caller-assigned job number, used for scratch naming and log context only.
    pub job_index: Option<u32>,
}

impl RenderRequest {
    /// Reject requests that cannot produce a video.
    pub fn validate(&self) -> ReelResult<()> {
        self.canvas.validate()?;
        if !(self.max_total_secs.is_finite() && self.max_total_secs > 0.0) {
            return Err(ReelError::validation("max_total_secs must be > 0"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ReelError::validation("output_path must not be empty"));
        }
        Ok(())
    }
}

/// Derived timeline of one job.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelinePlan {
    /// Decoded narration duration in seconds.
    pub narration_secs: f64,
    /// `min(narration_secs, max_total_secs)`.
    pub total_secs: f64,
    /// Background segments.
    pub segments: Vec<ImageSegment>,
    /// Caption chunks.
    pub captions: Vec<CaptionChunk>,
}

/// Derive the timeline from a known narration duration. Pure.
pub fn plan_timeline(
    config: &CompositorConfig,
    request: &RenderRequest,
    narration_secs: f64,
) -> TimelinePlan {
    let total_secs = narration_secs.min(request.max_total_secs);
    let segments = allocate_segments(
        &request.image_paths,
        total_secs,
        config.per_image_cap_secs,
        config.zoom_factor,
    );
    let captions = chunk_captions(
        &request.script_text,
        total_secs,
        ChunkOpts {
            words_per_chunk: config.caption_chunk_words,
            pacing: config.caption_pacing,
            min_secs: config.min_caption_secs,
            overflow: config.caption_overflow,
        },
    );
    TimelinePlan {
        narration_secs,
        total_secs,
        segments,
        captions,
    }
}

/// Stateless compositor: every call is a function of its request, the config and the files it
/// reads.
#[derive(Clone, Debug)]
pub struct Compositor {
    config: CompositorConfig,
    capability: EncoderCapability,
    scratch_root: Option<PathBuf>,
}

struct PreparedJob {
    // Keeps caption PNGs and the audio mix alive until the job ends.
    _scratch: ScratchDir,
    timeline: TimelinePlan,
    plan: RenderPlan,
}

impl Compositor {
    /// Build a compositor for an already-probed encoder capability.
    pub fn new(config: CompositorConfig, capability: EncoderCapability) -> ReelResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            capability,
            scratch_root: None,
        })
    }

    /// Place scratch directories under `root` instead of the system temp directory.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Encoder capability this compositor renders with.
    pub fn capability(&self) -> EncoderCapability {
        self.capability
    }

    /// Decode the narration and derive the timeline without rendering.
    pub fn plan(&self, request: &RenderRequest) -> ReelResult<TimelinePlan> {
        request.validate()?;
        let narration = load_narration(&request.narration_audio_path)?;
        Ok(plan_timeline(&self.config, request, narration.duration_secs()))
    }

    /// Run one full job: decode, plan, rasterize, mix, encode and validate.
    ///
    /// Fatal input and validation errors are returned as `Err`; exhausted encoder retries come
    /// back as a [`RenderResult`] with `success == false`.
    #[tracing::instrument(skip_all, fields(job = ?request.job_index, out = %request.output_path.display()))]
    pub fn compose(&self, request: &RenderRequest) -> ReelResult<RenderResult> {
        request.validate()?;
        let narration = load_narration(&request.narration_audio_path)?;
        let job = self.prepare(request, &narration)?;
        ensure_parent_dir(&request.output_path)?;

        validate_and_retry(
            |profile| {
                let mut sink = FfmpegSink::new(FfmpegSinkOpts {
                    out_path: request.output_path.clone(),
                    profile: profile.clone(),
                    threads: self.config.threads,
                });
                render_plan(&job.plan, &mut sink, self.config.threads)
            },
            &request.output_path,
            EncoderProfile::fast(self.capability),
            self.config.min_output_bytes,
        )
    }

    /// Render an already-decoded narration into an arbitrary sink, skipping artifact validation.
    pub fn render_to_sink(
        &self,
        request: &RenderRequest,
        narration: &AudioTrack,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<TimelinePlan> {
        request.validate()?;
        if !(narration.duration_secs() > 0.0) {
            return Err(ReelError::fatal_input("narration has no audio samples"));
        }
        let job = self.prepare(request, narration)?;
        render_plan(&job.plan, sink, self.config.threads)?;
        Ok(job.timeline)
    }

    fn prepare(&self, request: &RenderRequest, narration: &AudioTrack) -> ReelResult<PreparedJob> {
        let timeline = plan_timeline(&self.config, request, narration.duration_secs());
        tracing::info!(
            narration_secs = timeline.narration_secs,
            total_secs = timeline.total_secs,
            segments = timeline.segments.len(),
            captions = timeline.captions.len(),
            "timeline planned"
        );

        let scratch = match self.scratch_root.as_deref() {
            Some(root) => ScratchDir::create_in(root, &request.output_path, request.job_index)?,
            None => ScratchDir::create(&request.output_path, request.job_index)?,
        };

        let captions = rasterize_captions(
            &timeline.captions,
            request.canvas,
            CaptionStyle {
                font_size: self.config.caption_font_size,
                anchor_y: self.config.caption_anchor_y,
            },
            scratch.path(),
        )?;

        let ambient = load_ambient(
            self.config.ambient_bed_path.as_deref(),
            narration.sample_rate,
            narration.channels,
        );
        let mixed = mix_tracks(
            narration,
            ambient.as_ref(),
            timeline.total_secs,
            self.config.ambient_gain,
        )?;
        let mix_path = scratch.path().join("mix.f32le");
        write_f32le_file(&mixed, &mix_path)?;

        let plan = RenderPlan {
            canvas: request.canvas,
            fps: self.config.fps,
            total_secs: timeline.total_secs,
            segments: timeline.segments.clone(),
            captions,
            caption_fade_secs: self.config.caption_fade_secs,
            overlay_alpha: self.config.overlay_alpha(),
            fallback_rgb: self.config.fallback_rgb,
            audio: Some(AudioInputConfig {
                path: mix_path,
                sample_rate: mixed.sample_rate,
                channels: mixed.channels,
            }),
        };
        Ok(PreparedJob {
            _scratch: scratch,
            timeline,
            plan,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/compositor.rs"]
mod tests;
