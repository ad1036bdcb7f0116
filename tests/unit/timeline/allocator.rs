use super::*;

fn paths(n: usize) -> Vec<PathBuf> {
    (1..=n).map(|i| PathBuf::from(format!("{i}.jpg"))).collect()
}

fn all_readable(_: &Path) -> bool {
    true
}

#[test]
fn four_images_over_sixty_seconds() {
    let segs = allocate_segments_with(&paths(4), 60.0, 10.0, 0.1, all_readable);
    let durs: Vec<f64> = segs.iter().map(|s| s.duration_secs).collect();
    assert_eq!(durs, vec![10.0, 10.0, 10.0, 30.0]);
    assert_eq!(segs[3].start_secs, 30.0);
}

#[test]
fn durations_sum_to_total() {
    for &(n, total, cap) in &[(3, 17.3, 6.0), (12, 901.7, 100.0), (1, 0.25, 6.0), (5, 7.1, 1.3)] {
        let segs = allocate_segments_with(&paths(n), total, cap, 0.05, all_readable);
        let sum: f64 = segs.iter().map(|s| s.duration_secs).sum();
        assert!((sum - total).abs() < 1e-9, "n={n} total={total} sum={sum}");
        for s in &segs[..segs.len() - 1] {
            assert!(s.duration_secs <= cap);
        }
    }
}

#[test]
fn segments_are_contiguous() {
    let segs = allocate_segments_with(&paths(5), 23.0, 4.0, 0.1, all_readable);
    assert_eq!(segs[0].start_secs, 0.0);
    for pair in segs.windows(2) {
        assert_eq!(pair[0].end_secs(), pair[1].start_secs);
    }
}

#[test]
fn surplus_images_are_not_emitted() {
    let segs = allocate_segments_with(&paths(8), 20.0, 6.0, 0.1, all_readable);
    let durs: Vec<f64> = segs.iter().map(|s| s.duration_secs).collect();
    assert_eq!(durs, vec![6.0, 6.0, 6.0, 2.0]);
}

#[test]
fn exact_fit_ends_on_the_filling_image() {
    let segs = allocate_segments_with(&paths(5), 12.0, 6.0, 0.1, all_readable);
    assert_eq!(segs.len(), 2);
    assert_eq!(segs[1].end_secs(), 12.0);
}

#[test]
fn empty_list_gives_one_fallback_segment() {
    let segs = allocate_segments(&[], 42.0, 6.0, 0.1);
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].image, None);
    assert_eq!(segs[0].start_secs, 0.0);
    assert_eq!(segs[0].duration_secs, 42.0);
}

#[test]
fn unreadable_image_keeps_its_slot() {
    let segs = allocate_segments(
        &[PathBuf::from("/definitely/not/here.png"), PathBuf::from("/nope.jpg")],
        9.0,
        6.0,
        0.1,
    );
    assert_eq!(segs.len(), 2);
    assert!(segs.iter().all(|s| s.image.is_none()));
    assert_eq!(segs[0].duration_secs, 6.0);
    assert_eq!(segs[1].duration_secs, 3.0);
}

#[test]
fn allocation_is_deterministic() {
    let a = allocate_segments_with(&paths(6), 77.7, 10.0, 0.05, all_readable);
    let b = allocate_segments_with(&paths(6), 77.7, 10.0, 0.05, all_readable);
    assert_eq!(a, b);
}
