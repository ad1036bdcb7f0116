use std::path::{Path, PathBuf};

use crate::encode::profile::EncoderProfile;
use crate::foundation::error::ReelResult;
use crate::render::pipeline::RenderState;

/// Outcome of a render job as seen by the caller.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RenderResult {
    /// Requested output path. Only points at a file when `success` is `true`.
    pub output_path: PathBuf,
    /// Size of the artifact after the last attempt.
    pub byte_size: u64,
    /// Whether the artifact passed validation.
    pub success: bool,
    /// Render attempts made (1 or 2).
    pub attempts: u32,
    /// Reason for the last failed attempt, if any.
    pub failure: Option<String>,
}

/// Size of `path` if it exists and is strictly larger than `min_bytes`.
pub fn check_artifact(path: &Path, min_bytes: u64) -> Option<u64> {
    let len = std::fs::metadata(path).ok().filter(|m| m.is_file())?.len();
    (len > min_bytes).then_some(len)
}

/// Run `render_fn` with `primary`, then once more with [`EncoderProfile::conservative`] if the
/// artifact is missing or undersized.
///
/// Encode errors count as a failed attempt; any other error propagates immediately. A stale file
/// is removed before each attempt and an undersized one after the terminal failure.
pub fn validate_and_retry<F>(
    mut render_fn: F,
    output_path: &Path,
    primary: EncoderProfile,
    min_bytes: u64,
) -> ReelResult<RenderResult>
where
    F: FnMut(&EncoderProfile) -> ReelResult<()>,
{
    let profiles = [primary, EncoderProfile::conservative()];
    let mut byte_size = 0;
    let mut failure = None;

    for (i, profile) in profiles.iter().enumerate() {
        let attempt = i as u32 + 1;
        remove_stale(output_path)?;
        tracing::info!(
            attempt,
            codec = profile.codec,
            preset = profile.preset,
            "render attempt"
        );

        match render_fn(profile) {
            Ok(()) => {}
            Err(e) if e.is_retryable() => {
                tracing::warn!(attempt, error = %e, "render attempt failed");
                failure = Some(e.to_string());
                byte_size = file_len(output_path);
                continue;
            }
            Err(e) => return Err(e),
        }

        match check_artifact(output_path, min_bytes) {
            Some(len) => {
                tracing::info!(state = ?RenderState::Validated, attempt, bytes = len, "render state");
                return Ok(RenderResult {
                    output_path: output_path.to_path_buf(),
                    byte_size: len,
                    success: true,
                    attempts: attempt,
                    failure: None,
                });
            }
            None => {
                byte_size = file_len(output_path);
                tracing::warn!(
                    attempt,
                    bytes = byte_size,
                    min_bytes,
                    "output artifact missing or undersized"
                );
                failure = Some(format!(
                    "output artifact is {byte_size} bytes (needs more than {min_bytes})"
                ));
            }
        }
    }

    remove_stale(output_path)?;
    tracing::info!(state = ?RenderState::Failed, attempts = profiles.len(), "render state");
    Ok(RenderResult {
        output_path: output_path.to_path_buf(),
        byte_size,
        success: false,
        attempts: profiles.len() as u32,
        failure,
    })
}

fn file_len(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

fn remove_stale(path: &Path) -> ReelResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed stale output");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("remove stale output '{}'", path.display()))
            .into()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/validate/artifact.rs"]
mod tests;
