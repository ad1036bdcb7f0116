pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Blend one premultiplied RGBA8 pixel over an opaque RGB destination pixel.
pub(crate) fn blend_premul_over_opaque(dst: &mut [u8], src_premul: &[u8]) {
    let a = u16::from(src_premul[3]);
    if a == 0 {
        return;
    }
    if a == 255 {
        dst[..3].copy_from_slice(&src_premul[..3]);
        return;
    }
    let inv = 255 - a;
    for c in 0..3 {
        let v = u16::from(src_premul[c]) + mul_div255_u16(u16::from(dst[c]), inv);
        dst[c] = v.min(255) as u8;
    }
}

/// Darken an opaque RGB pixel toward black by `alpha` (0..=255).
pub(crate) fn darken_opaque(dst: &mut [u8], alpha: u8) {
    let inv = 255 - u16::from(alpha);
    for c in dst.iter_mut().take(3) {
        *c = mul_div255_u16(u16::from(*c), inv) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
