//! 26.6 fixed point: how font backends talk about pixels
//!
//! Glyph metrics arrive as 1/64-pixel units. Everything that ends up in the
//! glyph table is a whole pixel, so the conversion rules live here.

use std::ops::{Add, Neg, Sub};

/// A value in 1/64 pixel units
///
/// ```rust
/// use spritefont_core::fixed::F26Dot6;
///
/// let x = F26Dot6::from_f32(5.5);
/// assert_eq!(x.raw(), 352);
/// assert_eq!(x.round_to_pixels(), 6);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct F26Dot6(i32);

impl F26Dot6 {
    pub const FRAC_BITS: u32 = 6;

    /// Isolates the 6 fractional bits
    pub const FRAC_MASK: i32 = (1 << Self::FRAC_BITS) - 1;

    pub const ONE: F26Dot6 = F26Dot6(1 << Self::FRAC_BITS);

    pub const ZERO: F26Dot6 = F26Dot6(0);

    pub const HALF: F26Dot6 = F26Dot6(1 << (Self::FRAC_BITS - 1));

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        F26Dot6(raw)
    }

    #[inline]
    pub const fn from_int(x: i32) -> Self {
        F26Dot6(x << Self::FRAC_BITS)
    }

    /// Nearest 1/64 to a float pixel value
    #[inline]
    pub fn from_f32(x: f32) -> Self {
        F26Dot6((x * 64.0).round() as i32)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn frac(self) -> i32 {
        self.0 & Self::FRAC_MASK
    }

    /// Whole pixels: arithmetic shift, plus one when the remainder is at
    /// least half a pixel.
    #[inline]
    pub const fn round_to_pixels(self) -> i32 {
        (self.0 >> Self::FRAC_BITS) + if self.frac() >= Self::HALF.0 { 1 } else { 0 }
    }

    #[inline]
    pub const fn floor(self) -> F26Dot6 {
        F26Dot6(self.0 & !Self::FRAC_MASK)
    }

    #[inline]
    pub const fn ceil(self) -> F26Dot6 {
        if self.frac() == 0 {
            self
        } else {
            F26Dot6((self.0 & !Self::FRAC_MASK) + Self::ONE.0)
        }
    }

    /// Nearest whole pixel, still in 26.6
    #[inline]
    pub const fn round(self) -> F26Dot6 {
        F26Dot6((self.0 + Self::HALF.0) & !Self::FRAC_MASK)
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 64.0
    }
}

impl Add for F26Dot6 {
    type Output = F26Dot6;

    #[inline]
    fn add(self, rhs: F26Dot6) -> F26Dot6 {
        F26Dot6(self.0 + rhs.0)
    }
}

impl Sub for F26Dot6 {
    type Output = F26Dot6;

    #[inline]
    fn sub(self, rhs: F26Dot6) -> F26Dot6 {
        F26Dot6(self.0 - rhs.0)
    }
}

impl Neg for F26Dot6 {
    type Output = F26Dot6;

    #[inline]
    fn neg(self) -> F26Dot6 {
        F26Dot6(-self.0)
    }
}

/// Whole pixels from a raw 26.6 value (see [`F26Dot6::round_to_pixels`])
#[inline]
pub const fn round_to_pixels(raw: i32) -> i32 {
    F26Dot6::from_raw(raw).round_to_pixels()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_pixels_rounds_half_up() {
        assert_eq!(round_to_pixels(0), 0);
        assert_eq!(round_to_pixels(31), 0);
        assert_eq!(round_to_pixels(32), 1);
        assert_eq!(round_to_pixels(64), 1);
        assert_eq!(round_to_pixels(64 * 20 + 40), 21);
    }

    #[test]
    fn round_to_pixels_truncates_toward_negative_infinity_first() {
        // -1.5 px: shift gives -2, remainder 32 rounds up to -1
        assert_eq!(round_to_pixels(-96), -1);
        // -1.75 px: shift gives -2, remainder 16 stays
        assert_eq!(round_to_pixels(-112), -2);
    }

    #[test]
    fn floor_and_ceil_snap_to_grid() {
        let v = F26Dot6::from_f32(2.3);
        assert_eq!(v.floor(), F26Dot6::from_int(2));
        assert_eq!(v.ceil(), F26Dot6::from_int(3));
        assert_eq!(F26Dot6::from_int(4).ceil(), F26Dot6::from_int(4));
        assert_eq!(F26Dot6::from_f32(-0.5).floor(), F26Dot6::from_int(-1));
        assert_eq!(F26Dot6::from_f32(2.5).round(), F26Dot6::from_int(3));
    }

    #[test]
    fn arithmetic_operators() {
        let a = F26Dot6::from_int(3);
        let b = F26Dot6::from_f32(0.5);
        assert_eq!((a + b).raw(), 224);
        assert_eq!((a - b).raw(), 160);
        assert_eq!((-a).raw(), -192);
        assert!((b.to_f32() - 0.5).abs() < f32::EPSILON);
    }
}
