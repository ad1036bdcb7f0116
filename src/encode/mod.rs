//! Encoding sinks and encoder selection.
//!
//! Sinks consume composed frames in timeline order and are driven by the render pipeline.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Codec/preset profiles and hardware capability probing.
pub mod profile;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
