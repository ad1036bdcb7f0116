//! storyreel turns a narration track, a script and a handful of stills into a captioned video.
//!
//! The whole timeline is derived from the narration duration:
//!
//! - background images share the duration in capped slots, each with a slow zoom
//! - the script is split into fixed-size word chunks, timed proportionally to word count
//! - an optional ambient bed is looped under the narration at low gain
//! - frames are composed on the CPU and streamed into `ffmpeg`
//! - the output file is checked and re-encoded once with a safer profile if it looks broken
//!
//! [`Compositor::compose`] runs a whole job; the building blocks are public for callers that want
//! only the timeline ([`plan_timeline`]) or a custom [`FrameSink`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Background image and audio decoding.
pub mod assets;
/// Narration and ambient-bed mixing.
pub mod audio;
/// Caption chunking and rasterization.
pub mod caption;
/// Compositor configuration and format presets.
pub mod config;
/// Encoder profiles and frame sinks.
pub mod encode;
/// Ken Burns motion curves.
pub mod motion;
/// Frame composition and the render loop.
pub mod render;
/// Job orchestration.
pub mod session;
/// Background timeline allocation.
pub mod timeline;
/// Output artifact validation.
pub mod validate;

pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, Point, Vec2};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::audio::mix::AudioTrack;
pub use crate::caption::chunker::{CaptionChunk, ChunkOpts, chunk_captions};
pub use crate::config::{CaptionOverflow, CompositorConfig, Format};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::profile::{EncoderCapability, EncoderProfile, probe_encoder_capability};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::motion::curve::MotionCurve;
pub use crate::render::frame::FrameRGBA;
pub use crate::render::pipeline::{RenderPlan, RenderState, render_plan};
pub use crate::session::compositor::{Compositor, RenderRequest, TimelinePlan, plan_timeline};
pub use crate::timeline::allocator::{ImageSegment, allocate_segments};
pub use crate::validate::artifact::{RenderResult, check_artifact, validate_and_retry};
