use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// Interleaved `f32` PCM.
#[derive(Clone, Debug)]
pub struct AudioTrack {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved samples. Shared so pass-through mixing does not copy.
    pub samples: Arc<Vec<f32>>,
}

impl AudioTrack {
    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / usize::from(self.channels)
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    fn frames_for_secs(&self, secs: f64) -> usize {
        (secs * f64::from(self.sample_rate)).round().max(0.0) as usize
    }
}

/// Combine narration with an optional ambient bed over exactly `total_secs`.
///
/// Without a bed the narration is returned as-is (sharing its sample buffer) when it already
/// spans `total_secs`, and truncated otherwise. With a bed, the bed is tiled to cover the
/// timeline, truncated, scaled by `ambient_gain`, and summed under the narration. A bed whose
/// sample rate or channel count differs from the narration is skipped. Narration is never
/// time-stretched.
pub fn mix_tracks(
    narration: &AudioTrack,
    ambient: Option<&AudioTrack>,
    total_secs: f64,
    ambient_gain: f32,
) -> ReelResult<AudioTrack> {
    if !(narration.duration_secs() > 0.0) {
        return Err(ReelError::fatal_input("narration has non-positive duration"));
    }
    if !(total_secs > 0.0) {
        return Err(ReelError::validation("mix duration must be > 0"));
    }

    let ch = usize::from(narration.channels);
    let total_frames = narration.frames_for_secs(total_secs);

    let ambient = ambient
        .filter(|a| a.frames() > 0)
        .filter(|a| bed_matches_narration(a, narration));
    let Some(ambient) = ambient else {
        if narration.frames() == total_frames {
            return Ok(narration.clone());
        }
        return Ok(fit_narration(narration, total_frames));
    };

    let bed = loop_to_frames(ambient, total_frames);
    let narr = narration.samples.as_slice();
    let mut out = Vec::<f32>::with_capacity(total_frames * ch);
    for (i, b) in bed.iter().enumerate() {
        let voice = narr.get(i).copied().unwrap_or(0.0);
        out.push((voice + b * ambient_gain).clamp(-1.0, 1.0));
    }

    tracing::debug!(
        bed_secs = ambient.duration_secs(),
        total_secs,
        loops = total_frames.div_ceil(ambient.frames()),
        "mixed ambient bed under narration"
    );

    Ok(AudioTrack {
        sample_rate: narration.sample_rate,
        channels: narration.channels,
        samples: Arc::new(out),
    })
}

fn bed_matches_narration(bed: &AudioTrack, narration: &AudioTrack) -> bool {
    if bed.sample_rate == narration.sample_rate && bed.channels == narration.channels {
        return true;
    }
    tracing::warn!(
        bed_rate = bed.sample_rate,
        bed_channels = bed.channels,
        narration_rate = narration.sample_rate,
        narration_channels = narration.channels,
        "ambient bed format differs from narration; narration only"
    );
    false
}

/// Tile `track` end-to-end and truncate to exactly `frames` sample frames.
pub fn loop_to_frames(track: &AudioTrack, frames: usize) -> Vec<f32> {
    let src = track.samples.as_slice();
    let want = frames * usize::from(track.channels);
    if src.is_empty() {
        return vec![0.0; want];
    }
    src.iter().copied().cycle().take(want).collect()
}

fn fit_narration(narration: &AudioTrack, total_frames: usize) -> AudioTrack {
    let want = total_frames * usize::from(narration.channels);
    let mut samples: Vec<f32> = narration.samples.iter().copied().take(want).collect();
    samples.resize(want, 0.0);
    AudioTrack {
        sample_rate: narration.sample_rate,
        channels: narration.channels,
        samples: Arc::new(samples),
    }
}

/// Write interleaved `f32` PCM samples to raw little-endian `.f32le` file.
pub fn write_f32le_file(track: &AudioTrack, out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create audio mix output directory '{}'",
                parent.display()
            )
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(track.samples.len() * 4);
    for &sample in track.samples.iter() {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes)
        .with_context(|| format!("failed to write mixed audio file '{}'", out_path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
