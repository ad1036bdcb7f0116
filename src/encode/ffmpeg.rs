use crate::assets::media::is_ffmpeg_on_path;
use crate::encode::profile::EncoderProfile;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path. Always overwritten.
    pub out_path: PathBuf,
    /// Codec/preset pair for this attempt.
    pub profile: EncoderProfile,
    /// Encoder worker threads. `None` lets ffmpeg pick.
    pub threads: Option<usize>,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path` with `profile`.
    pub fn new(out_path: impl Into<PathBuf>, profile: EncoderProfile) -> Self {
        Self {
            out_path: out_path.into(),
            profile,
            threads: None,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames to stdin.
///
/// Audio is optional and provided through `SinkConfig.audio`.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ReelError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ReelError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if cfg.duration_secs.is_nan() || cfg.duration_secs <= 0.0 {
            return Err(ReelError::validation("ffmpeg sink duration must be > 0"));
        }

        ensure_parent_dir(&self.opts.out_path)?;

        if !is_ffmpeg_on_path() {
            return Err(ReelError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let args = build_ffmpeg_args(&self.opts, &cfg)?;
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ReelError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            codec = self.opts.profile.codec,
            preset = self.opts.profile.preset,
            out = %self.opts.out_path.display(),
            "spawned ffmpeg"
        );

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ReelError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            ReelError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::encode("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| ReelError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ReelError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ReelError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        // An abandoned render must not leave ffmpeg waiting on stdin.
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Assemble the ffmpeg argument list for one encode.
pub(crate) fn build_ffmpeg_args(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> ReelResult<Vec<String>> {
    let mut args: Vec<String> = [
        "-y",
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.push(format!("{}x{}", cfg.width, cfg.height));
    push_input_fps(&mut args, cfg.fps);
    args.extend(["-i".to_string(), "pipe:0".to_string()]);

    if let Some(audio) = cfg.audio.as_ref() {
        if audio.sample_rate == 0 {
            return Err(ReelError::validation(
                "audio sample_rate must be non-zero when audio is enabled",
            ));
        }
        if audio.channels == 0 {
            return Err(ReelError::validation(
                "audio channels must be non-zero when audio is enabled",
            ));
        }
        args.extend([
            "-f".to_string(),
            "f32le".to_string(),
            "-ar".to_string(),
            audio.sample_rate.to_string(),
            "-ac".to_string(),
            audio.channels.to_string(),
            "-i".to_string(),
            audio.path.to_string_lossy().into_owned(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-map".to_string(),
            "1:a:0".to_string(),
        ]);
    }

    args.extend([
        "-c:v".to_string(),
        opts.profile.codec.to_string(),
        "-preset".to_string(),
        opts.profile.preset.to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
    ]);
    if let Some(n) = opts.threads {
        args.extend(["-threads".to_string(), n.to_string()]);
    }
    if cfg.audio.is_some() {
        args.extend([
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            "192k".to_string(),
        ]);
    } else {
        args.push("-an".to_string());
    }
    args.extend([
        "-t".to_string(),
        format!("{:.3}", cfg.duration_secs),
        "-movflags".to_string(),
        "+faststart".to_string(),
        opts.out_path.to_string_lossy().into_owned(),
    ]);
    Ok(args)
}

fn push_input_fps(args: &mut Vec<String>, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    args.extend(["-r".to_string(), format!("{}/{}", fps.num, fps.den)]);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
