use super::*;
use crate::encode::profile::EncoderCapability;
use crate::encode::sink::AudioInputConfig;

fn cfg(audio: bool) -> SinkConfig {
    SinkConfig {
        width: 1080,
        height: 1920,
        fps: Fps::new(24, 1).unwrap(),
        duration_secs: 42.5,
        audio: audio.then(|| AudioInputConfig {
            path: PathBuf::from("/tmp/job/mix.f32le"),
            sample_rate: 48_000,
            channels: 2,
        }),
    }
}

fn pos(args: &[String], flag: &str) -> usize {
    args.iter().position(|a| a == flag).unwrap()
}

#[test]
fn args_carry_profile_duration_and_audio() {
    let mut opts = FfmpegSinkOpts::new(
        "/tmp/out/video.mp4",
        EncoderProfile::fast(EncoderCapability::Software),
    );
    opts.threads = Some(4);
    let args = build_ffmpeg_args(&opts, &cfg(true)).unwrap();

    assert_eq!(args[pos(&args, "-c:v") + 1], "libx264");
    assert_eq!(args[pos(&args, "-preset") + 1], "ultrafast");
    assert_eq!(args[pos(&args, "-t") + 1], "42.500");
    assert_eq!(args[pos(&args, "-s") + 1], "1080x1920");
    assert_eq!(args[pos(&args, "-r") + 1], "24/1");
    assert_eq!(args[pos(&args, "-threads") + 1], "4");
    assert_eq!(args[pos(&args, "-c:a") + 1], "aac");
    assert!(args.contains(&"/tmp/job/mix.f32le".to_string()));
    assert_eq!(args.last().unwrap(), "/tmp/out/video.mp4");
    assert!(pos(&args, "-r") < pos(&args, "-i"));
}

#[test]
fn args_without_audio_disable_audio_stream() {
    let opts = FfmpegSinkOpts::new("v.mp4", EncoderProfile::conservative());
    let args = build_ffmpeg_args(&opts, &cfg(false)).unwrap();
    assert!(args.contains(&"-an".to_string()));
    assert!(!args.contains(&"-c:a".to_string()));
    assert!(!args.contains(&"-threads".to_string()));
    assert_eq!(args[pos(&args, "-preset") + 1], "medium");
}

#[test]
fn zero_sample_rate_is_rejected() {
    let opts = FfmpegSinkOpts::new("v.mp4", EncoderProfile::conservative());
    let mut c = cfg(true);
    if let Some(a) = c.audio.as_mut() {
        a.sample_rate = 0;
    }
    assert!(build_ffmpeg_args(&opts, &c).is_err());
}

#[test]
fn odd_canvas_is_rejected_before_spawn() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("v.mp4", EncoderProfile::conservative()));
    let mut c = cfg(false);
    c.width = 1081;
    assert!(matches!(sink.begin(c), Err(ReelError::Validation(_))));
}
