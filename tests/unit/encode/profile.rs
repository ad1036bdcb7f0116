use super::*;

#[test]
fn fast_profile_follows_capability() {
    let hw = EncoderProfile::fast(EncoderCapability::Nvenc);
    assert!(hw.hardware);
    assert_eq!(hw.codec, "h264_nvenc");

    let sw = EncoderProfile::fast(EncoderCapability::Software);
    assert!(!sw.hardware);
    assert_eq!(sw.codec, "libx264");
    assert_eq!(sw.preset, "ultrafast");
}

#[test]
fn conservative_profile_is_slow_software() {
    let p = EncoderProfile::conservative();
    assert!(!p.hardware);
    assert_eq!(p.codec, "libx264");
    assert_ne!(p.preset, EncoderProfile::fast(EncoderCapability::Software).preset);
}
