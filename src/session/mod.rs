/// Job orchestration: request validation, timeline planning, rendering and validation.
pub mod compositor;
/// Per-job scratch directories.
pub mod scratch;
