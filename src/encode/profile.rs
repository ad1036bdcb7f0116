use std::process::{Command, Stdio};

/// Encoder capability of the host, resolved once at process start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderCapability {
    /// NVIDIA NVENC H.264 encoding works through `ffmpeg`.
    Nvenc,
    /// Only software encoding is available.
    Software,
}

/// Codec/preset pair handed to the encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderProfile {
    /// `ffmpeg` video codec name.
    pub codec: &'static str,
    /// Codec preset.
    pub preset: &'static str,
    /// Whether the codec is hardware accelerated.
    pub hardware: bool,
}

impl EncoderProfile {
    /// Fast path for the resolved capability.
    pub fn fast(cap: EncoderCapability) -> Self {
        match cap {
            EncoderCapability::Nvenc => Self {
                codec: "h264_nvenc",
                preset: "p2",
                hardware: true,
            },
            EncoderCapability::Software => Self {
                codec: "libx264",
                preset: "ultrafast",
                hardware: false,
            },
        }
    }

    /// Slower software profile used for the single validator retry.
    pub fn conservative() -> Self {
        Self {
            codec: "libx264",
            preset: "medium",
            hardware: false,
        }
    }
}

/// Check whether `ffmpeg` can encode with `h264_nvenc` on this host.
///
/// NVENC rejects tiny frames, so the probe encodes a short 256x256 test source.
pub fn probe_encoder_capability() -> EncoderCapability {
    let result = Command::new("ffmpeg")
        .args([
            "-v",
            "error",
            "-f",
            "lavfi",
            "-i",
            "testsrc=duration=0.1:size=256x256:rate=10",
            "-c:v",
            "h264_nvenc",
            "-f",
            "null",
            "-",
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(status) if status.success() => {
            tracing::info!("hardware encoder available: h264_nvenc");
            EncoderCapability::Nvenc
        }
        Ok(_) => {
            tracing::info!("h264_nvenc unavailable; using libx264");
            EncoderCapability::Software
        }
        Err(e) => {
            tracing::debug!(error = %e, "encoder probe could not run ffmpeg");
            EncoderCapability::Software
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/profile.rs"]
mod tests;
