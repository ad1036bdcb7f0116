use super::*;

#[test]
fn wrap_respects_line_budget() {
    let lines = wrap_words("the quick brown fox jumps over the lazy dog", 10);
    assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
    assert!(lines.iter().all(|l| l.chars().count() <= 10));
}

#[test]
fn wrap_keeps_overlong_words_whole() {
    let lines = wrap_words("a supercalifragilistic b", 5);
    assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
}

#[test]
fn svg_text_is_escaped() {
    assert_eq!(escape_xml(r#"R&D <"x">"#), "R&amp;D &lt;&quot;x&quot;&gt;");
}

#[test]
fn premultiply_unpremultiply_opaque_is_identity() {
    let px = vec![10u8, 20, 30, 255, 0, 0, 0, 0];
    let mut p = unpremultiply(&px);
    premultiply_rgba8_in_place(&mut p);
    assert_eq!(p, px);
}

#[test]
fn rasterized_caption_lands_in_scratch_and_reloads() {
    let dir = std::env::temp_dir().join(format!("storyreel_caption_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let canvas = Canvas::new(320, 240).unwrap();
    let chunk = CaptionChunk {
        text: "hello caption world".to_string(),
        start_secs: 1.0,
        duration_secs: 2.0,
    };
    let style = CaptionStyle {
        font_size: 24.0,
        anchor_y: 0.5,
    };
    let assets = rasterize_captions(&[chunk], canvas, style, &dir).unwrap();
    assert_eq!(assets.len(), 1);
    let a = &assets[0];
    assert!(a.path.starts_with(&dir));
    assert!(a.path.is_file());
    assert_eq!(a.width, 320);
    assert!(a.top + a.height <= canvas.height);
    assert_eq!(a.start_secs, 1.0);
    assert_eq!(a.end_secs, 3.0);

    let px = load_caption_pixels(a).unwrap();
    assert_eq!(px.rgba8_premul.len(), (px.width * px.height * 4) as usize);

    let _ = std::fs::remove_dir_all(&dir);
}
