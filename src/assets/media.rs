use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::audio::mix::AudioTrack;
use crate::foundation::error::{ReelError, ReelResult};

/// Internal audio mixing sample rate used across decode/mix/encode pipeline.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Channel count used across decode/mix/encode pipeline.
pub const MIX_CHANNELS: u16 = 2;

/// Decode any ffmpeg-readable audio file to stereo interleaved `f32` PCM.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> ReelResult<AudioTrack> {
    decode_audio_f32(path, sample_rate, MIX_CHANNELS)
}

/// Decode any ffmpeg-readable audio file to interleaved `f32` PCM at `sample_rate`/`channels`.
pub fn decode_audio_f32(path: &Path, sample_rate: u32, channels: u16) -> ReelResult<AudioTrack> {
    if sample_rate == 0 || channels == 0 {
        return Err(ReelError::validation(
            "audio decode sample_rate/channels must be non-zero",
        ));
    }
    if !path.is_file() {
        return Err(ReelError::Other(anyhow::anyhow!(
            "audio file '{}' does not exist",
            path.display()
        )));
    }

    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &channels.to_string(),
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ReelError::Other(anyhow::anyhow!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(ReelError::Other(anyhow::anyhow!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(ReelError::Other(anyhow::anyhow!(
            "decoded audio byte length is not aligned to f32 samples"
        )));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(AudioTrack {
        sample_rate,
        channels,
        samples: Arc::new(pcm),
    })
}

/// Decode narration audio. Any failure, or a track without samples, is fatal.
pub fn load_narration(path: &Path) -> ReelResult<AudioTrack> {
    let track = decode_audio_f32_stereo(path, MIX_SAMPLE_RATE).map_err(|e| {
        ReelError::fatal_input(format!("narration '{}' unreadable: {e}", path.display()))
    })?;
    if !(track.duration_secs() > 0.0) {
        return Err(ReelError::fatal_input(format!(
            "narration '{}' has no audio samples",
            path.display()
        )));
    }
    Ok(track)
}

/// Decode the optional ambient bed in the narration's format. Failures degrade to `None`.
pub fn load_ambient(path: Option<&Path>, sample_rate: u32, channels: u16) -> Option<AudioTrack> {
    let path = path?;
    match decode_audio_f32(path, sample_rate, channels) {
        Ok(track) if track.frames() > 0 => Some(track),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "ambient bed is empty; narration only");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ambient bed unavailable; narration only");
            None
        }
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
