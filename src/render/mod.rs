/// Per-frame CPU compositing of background, overlay and caption layers.
pub mod compose;
/// Output frame buffers.
pub mod frame;
/// Frame-ordered render loop feeding a [`FrameSink`](crate::encode::sink::FrameSink).
pub mod pipeline;
