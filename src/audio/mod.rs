/// PCM tracks, ambient looping, and narration/bed mixing.
pub mod mix;
