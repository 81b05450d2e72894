//! Bit helpers shared by the template parser, the automaton and the operand extractor

/// Mask covering the `width` least-significant bits. Widths of 32 and above give all ones.
#[inline]
pub const fn low_mask(width: u8) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// Sign-extend a value of specified bit width to i32
///
/// Bit `width - 1` is replicated through bit 31. `width` must be in `1..=32`.
#[inline]
pub const fn sign_extend(value: u32, width: u8) -> i32 {
    let shift = 32 - width as u32;
    ((value << shift) as i32) >> shift
}
