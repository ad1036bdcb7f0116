use super::*;
use crate::encode::profile::EncoderCapability;
use crate::foundation::error::ReelError;

fn temp_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "storyreel_validate_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("out.mp4")
}

#[test]
fn first_attempt_success_needs_no_retry() {
    let out = temp_file("ok");
    let mut used = Vec::new();
    let res = validate_and_retry(
        |p| {
            used.push(p.clone());
            std::fs::write(&out, vec![1u8; 4096]).unwrap();
            Ok(())
        },
        &out,
        EncoderProfile::fast(EncoderCapability::Nvenc),
        1024,
    )
    .unwrap();

    assert!(res.success);
    assert_eq!(res.attempts, 1);
    assert_eq!(res.byte_size, 4096);
    assert_eq!(used, vec![EncoderProfile::fast(EncoderCapability::Nvenc)]);
    assert!(out.exists());
}

#[test]
fn zero_byte_output_retries_once_then_fails() {
    let out = temp_file("zero");
    let mut used = Vec::new();
    let res = validate_and_retry(
        |p| {
            used.push(p.clone());
            std::fs::write(&out, b"").unwrap();
            Ok(())
        },
        &out,
        EncoderProfile::fast(EncoderCapability::Software),
        1024,
    )
    .unwrap();

    assert!(!res.success);
    assert_eq!(res.attempts, 2);
    assert_eq!(res.byte_size, 0);
    assert_eq!(
        used,
        vec![
            EncoderProfile::fast(EncoderCapability::Software),
            EncoderProfile::conservative()
        ]
    );
    assert!(!out.exists(), "undersized artifact must be removed");
}

#[test]
fn retry_with_conservative_profile_can_recover() {
    let out = temp_file("recover");
    let res = validate_and_retry(
        |p| {
            if p.hardware {
                return Err(ReelError::encode("driver fault"));
            }
            std::fs::write(&out, vec![7u8; 2048]).unwrap();
            Ok(())
        },
        &out,
        EncoderProfile::fast(EncoderCapability::Nvenc),
        1024,
    )
    .unwrap();

    assert!(res.success);
    assert_eq!(res.attempts, 2);
    assert_eq!(res.failure, None);
}

#[test]
fn stale_output_is_removed_before_each_attempt() {
    let out = temp_file("stale");
    std::fs::write(&out, vec![9u8; 8192]).unwrap();
    let mut seen_existing = Vec::new();
    let res = validate_and_retry(
        |_| {
            seen_existing.push(out.exists());
            Ok(())
        },
        &out,
        EncoderProfile::conservative(),
        1024,
    )
    .unwrap();

    assert_eq!(seen_existing, vec![false, false]);
    assert!(!res.success);
}

#[test]
fn non_encode_errors_propagate_without_retry() {
    let out = temp_file("fatal");
    let mut calls = 0;
    let err = validate_and_retry(
        |_| {
            calls += 1;
            Err(ReelError::fatal_input("narration unreadable"))
        },
        &out,
        EncoderProfile::conservative(),
        1024,
    )
    .unwrap_err();

    assert!(matches!(err, ReelError::FatalInput(_)));
    assert_eq!(calls, 1);
}

#[test]
fn check_artifact_requires_strictly_more_than_threshold() {
    let out = temp_file("threshold");
    std::fs::write(&out, vec![0u8; 1024]).unwrap();
    assert_eq!(check_artifact(&out, 1024), None);
    std::fs::write(&out, vec![0u8; 1025]).unwrap();
    assert_eq!(check_artifact(&out, 1024), Some(1025));
    assert_eq!(check_artifact(&out.with_extension("missing"), 0), None);
}
