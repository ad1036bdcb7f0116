use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context as _;

use crate::foundation::error::ReelResult;

/// A per-job scratch directory, removed with everything in it on drop.
///
/// The name combines the output stem, the optional job index, the process id, a timestamp and a
/// per-process sequence number, so concurrent jobs never share one.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create a scratch directory under the system temp directory.
    pub fn create(output_path: &Path, job_index: Option<u32>) -> ReelResult<Self> {
        Self::create_in(&std::env::temp_dir(), output_path, job_index)
    }

    /// Create a scratch directory under `root`.
    pub fn create_in(root: &Path, output_path: &Path, job_index: Option<u32>) -> ReelResult<Self> {
        let path = root.join(scratch_name(output_path, job_index));
        std::fs::create_dir_all(&path)
            .with_context(|| format!("create scratch directory '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "created scratch directory");
        Ok(Self { path })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(std::mem::take(&mut self.path));
    }
}

static SCRATCH_SEQ: AtomicU64 = AtomicU64::new(0);

fn scratch_name(output_path: &Path, job_index: Option<u32>) -> String {
    let stem: String = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "render".to_string())
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = SCRATCH_SEQ.fetch_add(1, Ordering::Relaxed);
    let pid = std::process::id();
    match job_index {
        Some(i) => format!("storyreel_{stem}_job{i}_{pid}_{nanos}_{seq}"),
        None => format!("storyreel_{stem}_{pid}_{nanos}_{seq}"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scratch.rs"]
mod tests;
