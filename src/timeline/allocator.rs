use std::path::{Path, PathBuf};

/// One background slot on the output timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ImageSegment {
    /// Source image, or `None` when the slot renders the fallback color.
    pub image: Option<PathBuf>,
    /// Timeline start in seconds.
    pub start_secs: f64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Scale gained over the segment by the motion curve.
    pub zoom_factor: f64,
}

impl ImageSegment {
    /// Exclusive timeline end in seconds.
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }
}

/// Remaining time below this is treated as exhausted.
const EXHAUSTED_EPS_SECS: f64 = 1e-9;

/// Partition `total_secs` across `image_paths` in order.
///
/// Every image but the last gets `min(per_image_cap_secs, remaining)`; the last emitted segment
/// absorbs the remainder, so durations always sum to `total_secs`. An empty list yields a single
/// fallback segment. Unreadable paths keep their slot but lose their image reference.
pub fn allocate_segments(
    image_paths: &[PathBuf],
    total_secs: f64,
    per_image_cap_secs: f64,
    zoom_factor: f64,
) -> Vec<ImageSegment> {
    allocate_segments_with(
        image_paths,
        total_secs,
        per_image_cap_secs,
        zoom_factor,
        is_readable_file,
    )
}

/// [`allocate_segments`] with an explicit readability check.
pub fn allocate_segments_with(
    image_paths: &[PathBuf],
    total_secs: f64,
    per_image_cap_secs: f64,
    zoom_factor: f64,
    readable: impl Fn(&Path) -> bool,
) -> Vec<ImageSegment> {
    if image_paths.is_empty() {
        tracing::warn!("no background images; using a solid fallback background");
        return vec![ImageSegment {
            image: None,
            start_secs: 0.0,
            duration_secs: total_secs,
            zoom_factor,
        }];
    }

    let mut segments = Vec::<ImageSegment>::with_capacity(image_paths.len());
    let mut start = 0.0f64;
    let last_idx = image_paths.len() - 1;

    for (i, path) in image_paths.iter().enumerate() {
        let remaining = total_secs - start;
        let capped = per_image_cap_secs.min(remaining);
        let is_last = i == last_idx || remaining - capped <= EXHAUSTED_EPS_SECS;
        let duration = if is_last { remaining } else { capped };

        let image = if readable(path) {
            Some(path.clone())
        } else {
            tracing::warn!(
                path = %path.display(),
                "background image is not readable; segment uses the fallback color"
            );
            None
        };

        segments.push(ImageSegment {
            image,
            start_secs: start,
            duration_secs: duration,
            zoom_factor,
        });
        start += duration;

        if is_last {
            if i < last_idx {
                tracing::debug!(
                    unused = last_idx - i,
                    "timeline filled before all background images were used"
                );
            }
            break;
        }
    }

    segments
}

fn is_readable_file(path: &Path) -> bool {
    std::fs::File::open(path)
        .and_then(|f| f.metadata())
        .map(|m| m.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/allocator.rs"]
mod tests;
