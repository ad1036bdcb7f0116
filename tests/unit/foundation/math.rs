use super::*;

#[test]
fn mul_div255_edges() {
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(255, 0), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
}

#[test]
fn blend_transparent_source_keeps_destination() {
    let mut dst = [10u8, 20, 30, 255];
    blend_premul_over_opaque(&mut dst, &[0, 0, 0, 0]);
    assert_eq!(dst, [10, 20, 30, 255]);
}

#[test]
fn blend_opaque_source_replaces_destination() {
    let mut dst = [10u8, 20, 30, 255];
    blend_premul_over_opaque(&mut dst, &[200, 100, 50, 255]);
    assert_eq!(dst, [200, 100, 50, 255]);
}

#[test]
fn blend_half_alpha_white_over_black() {
    let mut dst = [0u8, 0, 0, 255];
    blend_premul_over_opaque(&mut dst, &[128, 128, 128, 128]);
    assert_eq!(dst[..3], [128, 128, 128]);
}

#[test]
fn darken_scales_channels() {
    let mut px = [200u8, 100, 0, 255];
    darken_opaque(&mut px, 102);
    assert_eq!(px, [120, 60, 0, 255]);
}
