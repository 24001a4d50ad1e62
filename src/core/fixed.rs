//! Q16.16 fixed-point arithmetic.
//!
//! Search scores, win values and the UCT formula all run on this type so
//! that a search is bit-for-bit reproducible for a given seed on every
//! platform. Values are unsigned; products and quotients are computed in
//! `u128` and rounded half-up.
//!
//! ```
//! use irq_tictactoe::core::fixed::{fixed_div, fixed_mul, Fixed};
//!
//! let three = Fixed::from_int(3);
//! let half = Fixed::HALF;
//! assert_eq!(fixed_mul(three, half), Fixed::from_f64(1.5));
//! assert_eq!(fixed_div(three, Fixed::from_int(2)), Fixed::from_f64(1.5));
//! ```

use std::ops::{Add, AddAssign, Div, Mul};

use serde::{Deserialize, Serialize};

/// Number of fractional bits.
pub const FRAC_BITS: u32 = 16;

/// Number of series terms used by [`fixed_log`].
pub const LN_SERIES_TERMS: u64 = 100;

/// Unsigned Q16.16 value.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Fixed(pub u64);

impl Fixed {
    /// 0.0
    pub const ZERO: Fixed = Fixed(0);
    /// 0.5
    pub const HALF: Fixed = Fixed(1 << (FRAC_BITS - 1));
    /// 1.0
    pub const ONE: Fixed = Fixed(1 << FRAC_BITS);
    /// Largest representable value; also the "always pick me" UCT score.
    pub const MAX: Fixed = Fixed(u64::MAX);

    /// Wrap a raw Q16.16 word.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw Q16.16 word.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Integer to fixed point.
    #[inline]
    #[must_use]
    pub const fn from_int(n: u64) -> Self {
        Self(n << FRAC_BITS)
    }

    /// Nearest fixed-point value to `value` (negative inputs clamp to zero).
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if value <= 0.0 {
            return Self::ZERO;
        }
        Self((value * (1u64 << FRAC_BITS) as f64).round() as u64)
    }

    /// Lossy conversion for display and logging.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1u64 << FRAC_BITS) as f64
    }

    /// `1.0 - self`, saturating at zero.
    ///
    /// Flips a score in `[0, 1]` to the other player's perspective.
    #[inline]
    #[must_use]
    pub const fn complement(self) -> Self {
        Self(Self::ONE.0.saturating_sub(self.0))
    }
}

/// Product of two fixed-point values, fractional remainder rounded half-up.
///
/// For `b >= 1.0`, `fixed_div(fixed_mul(a, b), b)` gives back `a` within
/// one ulp. Below one the product drops fractional bits of `a` that the
/// division cannot restore.
#[inline]
#[must_use]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    let product = a.0 as u128 * b.0 as u128 + (1u128 << (FRAC_BITS - 1));
    Fixed((product >> FRAC_BITS) as u64)
}

/// Quotient of two fixed-point values, rounded half-up.
///
/// Division by zero saturates to [`Fixed::MAX`]. Undoes [`fixed_mul`]
/// within one ulp only when the divisor is at least `1.0`.
#[inline]
#[must_use]
pub fn fixed_div(a: Fixed, b: Fixed) -> Fixed {
    if b.0 == 0 {
        return Fixed::MAX;
    }
    let numerator = ((a.0 as u128) << FRAC_BITS) + (b.0 as u128 >> 1);
    Fixed((numerator / b.0 as u128) as u64)
}

/// Natural logarithm for `n >= 1.0`.
///
/// Uses the series `ln(n) = 2 * sum(t^(2k+1) / (2k+1))` with
/// `t = (n - 1) / (n + 1)`, always evaluating [`LN_SERIES_TERMS`] terms.
/// Inputs below one clamp to `ln(1) = 0`.
#[must_use]
pub fn fixed_log(n: Fixed) -> Fixed {
    if n <= Fixed::ONE {
        return Fixed::ZERO;
    }

    let mut term = fixed_div(Fixed(n.0 - Fixed::ONE.0), Fixed(n.0 + Fixed::ONE.0));
    let ratio = fixed_mul(term, term);
    let mut result = Fixed::ZERO;

    for k in 0..LN_SERIES_TERMS {
        result += fixed_div(term, Fixed::from_int(2 * k + 1));
        term = fixed_mul(term, ratio);
    }

    Fixed(result.0 << 1)
}

/// Square root via digit-by-digit integer square root of the raw word.
///
/// `sqrt(r / 2^16) * 2^16 == isqrt(r) * 2^8`, so the integer root is
/// shifted back into Q16.16.
#[must_use]
pub fn fixed_sqrt(x: Fixed) -> Fixed {
    if x.0 == 0 || x == Fixed::ONE {
        return x;
    }

    let mut rem = x.0;
    let mut root = 0u64;
    let mut bit = 1u64 << ((63 - rem.leading_zeros()) & !1);

    while bit != 0 {
        let trial = root + bit;
        root >>= 1;
        if rem >= trial {
            rem -= trial;
            root += bit;
        }
        bit >>= 2;
    }

    Fixed(root << (FRAC_BITS / 2))
}

impl Add for Fixed {
    type Output = Fixed;

    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    fn mul(self, rhs: Fixed) -> Fixed {
        fixed_mul(self, rhs)
    }
}

impl Div for Fixed {
    type Output = Fixed;

    fn div(self, rhs: Fixed) -> Fixed {
        fixed_div(self, rhs)
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.to_f64())
    }
}
