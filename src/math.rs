//! Fixed-point component math for blending

use crate::color::Color;
use crate::color::Rgba8;

/// Interpolate between two components by `a`, in fixed-point math
pub fn lerp_u8(p: u8, q: u8, a: u8) -> u8 {
    let base_shift = 8;
    let base_msb = 1 << (base_shift - 1);
    let v = if p > q { 1 } else { 0 };
    let (q, p, a) = (i32::from(q), i32::from(p), i32::from(a));
    let t0: i32 = (q - p) * a + base_msb - v;
    let t1: i32 = ((t0 >> base_shift) + t0) >> base_shift;
    (p + t1) as u8
}

/// Multiply two components, in fixed-point math
pub fn multiply_u8(a: u8, b: u8) -> u8 {
    let base_shift = 8;
    let base_msb = 1 << (base_shift - 1);
    let (a, b) = (u32::from(a), u32::from(b));
    let t: u32 = a * b + base_msb;
    let tt: u32 = ((t >> base_shift) + t) >> base_shift;
    tt as u8
}

/// Blend a color over a pixel at the given coverage
pub fn blend_pix<C1: Color, C2: Color>(p: &C1, c: &C2, cover: u64) -> Rgba8 {
    debug_assert!(c.alpha() >= 0.0 && c.alpha() <= 1.0);
    let alpha = multiply_u8(c.alpha8(), cover as u8);
    Rgba8::new(
        lerp_u8(p.red8(), c.red8(), alpha),
        lerp_u8(p.green8(), c.green8(), alpha),
        lerp_u8(p.blue8(), c.blue8(), alpha),
        lerp_u8(p.alpha8(), c.alpha8(), alpha),
    )
}
