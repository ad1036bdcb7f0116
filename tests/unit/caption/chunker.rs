use super::*;

fn opts(words: usize, pacing: f64, min_secs: f64) -> ChunkOpts {
    ChunkOpts {
        words_per_chunk: words,
        pacing,
        min_secs,
        overflow: CaptionOverflow::Drop,
    }
}

fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
}

#[test]
fn forty_words_in_eight_seconds_make_ten_chunks() {
    let min_secs = 0.5;
    let chunks = chunk_captions(&words(40), 8.0, opts(4, 1.0, min_secs));
    assert_eq!(chunks.len(), 10);

    let total: f64 = chunks.iter().map(|c| c.duration_secs).sum();
    assert!(total <= 8.0 + 1e-9);
    for c in &chunks {
        assert!(c.duration_secs >= min_secs);
        assert_eq!(c.text.split_whitespace().count(), 4);
    }
}

#[test]
fn chunks_are_contiguous_from_zero() {
    let chunks = chunk_captions(&words(37), 30.0, opts(4, 1.1, 1.5));
    assert_eq!(chunks[0].start_secs, 0.0);
    for pair in chunks.windows(2) {
        assert_eq!(pair[0].start_secs + pair[0].duration_secs, pair[1].start_secs);
    }
}

#[test]
fn floor_applies_to_short_chunks() {
    // 100 words over 10s => 0.1s/word, 2-word chunk => 0.2s raw.
    let chunks = chunk_captions(&words(100), 10.0, opts(2, 1.0, 1.5));
    assert_eq!(chunks[0].duration_secs, 1.5);
}

#[test]
fn trailing_words_are_dropped_once_time_runs_out() {
    let chunks = chunk_captions(&words(100), 10.0, opts(2, 1.0, 1.5));
    // 1.5s floor => 6 full chunks (9s) + one clipped chunk of 1s.
    assert_eq!(chunks.len(), 7);
    let last = chunks.last().unwrap();
    assert!((last.end_secs() - 10.0).abs() < 1e-9);
    assert!((last.duration_secs - 1.0).abs() < 1e-9);
    let kept: usize = chunks.iter().map(|c| c.text.split_whitespace().count()).sum();
    assert_eq!(kept, 14);
}

#[test]
fn merge_policy_keeps_every_word() {
    let mut o = opts(2, 1.0, 1.5);
    o.overflow = CaptionOverflow::MergeIntoLast;
    let chunks = chunk_captions(&words(100), 10.0, o);
    assert_eq!(chunks.len(), 7);
    let kept: usize = chunks.iter().map(|c| c.text.split_whitespace().count()).sum();
    assert_eq!(kept, 100);
    assert!(chunks.last().unwrap().text.ends_with("w99"));
}

#[test]
fn empty_text_yields_no_chunks() {
    assert!(chunk_captions("", 10.0, opts(4, 1.0, 1.5)).is_empty());
    assert!(chunk_captions("   \n\t ", 10.0, opts(4, 1.0, 1.5)).is_empty());
}

#[test]
fn text_shorter_than_one_chunk_is_one_caption() {
    let chunks = chunk_captions("hello there", 4.0, opts(4, 1.0, 1.5));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "hello there");
    assert_eq!(chunks[0].duration_secs, 4.0);
}

#[test]
fn identical_inputs_give_identical_chunks() {
    let a = chunk_captions(&words(55), 21.3, opts(4, 1.1, 1.5));
    let b = chunk_captions(&words(55), 21.3, opts(4, 1.1, 1.5));
    assert_eq!(a, b);
}
