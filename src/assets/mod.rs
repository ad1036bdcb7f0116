/// Background image decoding and cover pre-scaling.
pub mod image;
/// `ffmpeg`-backed audio decoding.
pub mod media;
