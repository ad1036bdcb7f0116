/// Output file post-condition checks and the single conservative retry.
pub mod artifact;
