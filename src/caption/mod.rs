/// Word-chunking of narration text into timed captions.
pub mod chunker;
/// Caption rasterization into per-job image assets.
pub mod raster;
