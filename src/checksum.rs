//! Checksum capability used during card number validation.
//!
//! Validation does not hard-code a checksum algorithm. A [`Validator`](crate::Validator)
//! holds an optional [`Checksum`], and a [`CardProfile`](crate::CardProfile) may carry
//! its own which takes precedence. The built-in [`Luhn`] implementation is
//! available behind the default `luhn` feature.

use std::fmt;

/// A checksum algorithm over a string of ASCII digits.
pub trait Checksum: Send + Sync {
    /// Short identifier for the algorithm, e.g. "luhn".
    fn name(&self) -> &str;

    /// Returns true if `digits` carries a valid checksum.
    ///
    /// `digits` is already normalized: ASCII digits only, never empty.
    fn verify(&self, digits: &str) -> bool;
}

/// Adapts a closure into a [`Checksum`].
///
/// ```
/// use cc_cardtype::checksum::{Checksum, ChecksumFn};
///
/// let even = ChecksumFn::new("even", |digits: &str| {
///     digits.bytes().last().map_or(false, |b| (b - b'0') % 2 == 0)
/// });
/// assert!(even.verify("4112"));
/// assert!(!even.verify("4111"));
/// ```
pub struct ChecksumFn<F> {
    name: String,
    verify: F,
}

impl<F> ChecksumFn<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    /// Wraps `verify` under the given name.
    pub fn new(name: impl Into<String>, verify: F) -> Self {
        Self {
            name: name.into(),
            verify,
        }
    }
}

impl<F> Checksum for ChecksumFn<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn verify(&self, digits: &str) -> bool {
        (self.verify)(digits)
    }
}

impl<F> fmt::Debug for ChecksumFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecksumFn")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The Luhn ("modulus 10") checksum.
#[cfg(feature = "luhn")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Luhn;

/// Doubled digit with 9 subtracted when the result exceeds 9, indexed by digit.
#[cfg(feature = "luhn")]
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

#[cfg(feature = "luhn")]
impl Luhn {
    /// Computes the Luhn sum of `digits` (not reduced modulo 10).
    ///
    /// Bytes that are not ASCII digits make the sum meaningless; callers
    /// pass normalized input.
    #[inline]
    pub fn sum(digits: &str) -> u32 {
        digits
            .bytes()
            .rev()
            .enumerate()
            .map(|(position, byte)| {
                let digit = byte.wrapping_sub(b'0') % 10;
                if position % 2 == 1 {
                    DOUBLE_TABLE[digit as usize] as u32
                } else {
                    digit as u32
                }
            })
            .sum()
    }

    /// Returns the check digit that completes `partial` into a valid number.
    ///
    /// ```
    /// use cc_cardtype::checksum::Luhn;
    ///
    /// assert_eq!(Luhn::check_digit("411111111111111"), 1);
    /// ```
    pub fn check_digit(partial: &str) -> u8 {
        // Every digit moves one position left once the check digit is appended.
        let shifted = Self::sum(&format!("{}0", partial));
        ((10 - (shifted % 10)) % 10) as u8
    }
}

#[cfg(feature = "luhn")]
impl Checksum for Luhn {
    fn name(&self) -> &str {
        "luhn"
    }

    #[inline]
    fn verify(&self, digits: &str) -> bool {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        Self::sum(digits) % 10 == 0
    }
}
