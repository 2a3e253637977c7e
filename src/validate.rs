//! Number and security code validation against a single profile.
//!
//! A number is valid for a profile when, after normalization, all of these
//! hold (checked in order, stopping at the first failure):
//!
//! 1. At least one digit remains
//! 2. The digit count satisfies one of the profile's length constraints
//! 3. The checksum passes, if the profile asks for one
//! 4. The leading digits fall in one of the profile's ID ranges
//!
//! The checksum step uses the profile's own [`Checksum`] when it has one,
//! otherwise the validator's. With neither, the step passes.

use std::fmt;
use std::sync::Arc;

use crate::checksum::Checksum;
use crate::input::CardInput;
use crate::matcher::{matches_id_range, matches_length, normalize_input};
use crate::profile::CardProfile;

/// Validates card numbers and security codes against profiles.
///
/// # Example
///
/// ```
/// use cc_cardtype::{catalog, Validator};
///
/// let visa = catalog::find("visa").unwrap();
///
/// // By default no checksum is wired in: only length and prefix are checked.
/// let validator = Validator::default();
/// assert!(validator.is_number_valid(visa, "4111 1111 1111 1111"));
/// assert!(validator.is_number_valid(visa, "4111 1111 1111 1112"));
/// ```
///
/// With the `luhn` feature the built-in checksum can be opted into:
///
/// ```
/// # #[cfg(feature = "luhn")]
/// # {
/// use cc_cardtype::{catalog, Luhn, Validator};
///
/// let visa = catalog::find("visa").unwrap();
/// let strict = Validator::with_checksum(Luhn);
/// assert!(strict.is_number_valid(visa, "4111 1111 1111 1111"));
/// assert!(!strict.is_number_valid(visa, "4111 1111 1111 1112"));
/// # }
/// ```
#[derive(Clone)]
pub struct Validator {
    checksum: Option<Arc<dyn Checksum>>,
}

impl Validator {
    /// Creates a validator with no checksum capability wired in.
    ///
    /// Same as [`Validator::without_checksum`]. Use
    /// [`Validator::with_checksum`] to opt into one.
    pub fn new() -> Self {
        Self::without_checksum()
    }

    /// Creates a validator with no checksum capability.
    ///
    /// Checksum gating then passes for every profile that does not carry
    /// its own checksum.
    pub fn without_checksum() -> Self {
        Self { checksum: None }
    }

    /// Creates a validator using the given checksum.
    pub fn with_checksum(checksum: impl Checksum + 'static) -> Self {
        Self {
            checksum: Some(Arc::new(checksum)),
        }
    }

    /// Creates a validator sharing an existing checksum.
    pub fn with_shared_checksum(checksum: Arc<dyn Checksum>) -> Self {
        Self {
            checksum: Some(checksum),
        }
    }

    /// Returns the validator's checksum, if any.
    pub fn checksum(&self) -> Option<&dyn Checksum> {
        self.checksum.as_deref()
    }

    /// Runs the checksum step for `profile` on already-normalized digits.
    pub(crate) fn passes_checksum(&self, profile: &CardProfile, digits: &str) -> bool {
        if !profile.needs_checksum() {
            return true;
        }
        match profile.checksum().or_else(|| self.checksum()) {
            Some(checksum) => checksum.verify(digits),
            None => true,
        }
    }

    /// Returns true if `number` is a valid card number for `profile`.
    pub fn is_number_valid<N: CardInput + ?Sized>(&self, profile: &CardProfile, number: &N) -> bool {
        let digits = normalize_input(number);
        !digits.is_empty()
            && matches_length(profile.lengths(), &digits)
            && self.passes_checksum(profile, &digits)
            && matches_id_range(profile.id_ranges(), &digits)
    }

    /// Returns true if `code` is a valid security code for `profile`.
    ///
    /// The code must consist of digits only and have exactly the length the
    /// profile requires. Integers lose leading zeros; pass `"012"` as text.
    pub fn is_code_valid<C: CardInput + ?Sized>(&self, profile: &CardProfile, code: &C) -> bool {
        let raw = code.raw();
        !raw.is_empty()
            && raw.bytes().all(|b| b.is_ascii_digit())
            && raw.len() == profile.security_code().length()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("checksum", &self.checksum().map(|c| c.name().to_string()))
            .finish()
    }
}

/// Validates `number` against `profile` with [`Validator::default`].
///
/// ```
/// use cc_cardtype::{catalog, is_number_valid};
///
/// let amex = catalog::find("american-express").unwrap();
/// assert!(is_number_valid(amex, "378282246310005"));
/// assert!(is_number_valid(amex, &378282246310005u64));
/// ```
pub fn is_number_valid<N: CardInput + ?Sized>(profile: &CardProfile, number: &N) -> bool {
    Validator::default().is_number_valid(profile, number)
}

/// Validates a security code against `profile`.
///
/// ```
/// use cc_cardtype::{catalog, is_code_valid};
///
/// let visa = catalog::find("visa").unwrap();
/// assert!(is_code_valid(visa, "123"));
/// assert!(!is_code_valid(visa, "12"));
/// ```
pub fn is_code_valid<C: CardInput + ?Sized>(profile: &CardProfile, code: &C) -> bool {
    Validator::without_checksum().is_code_valid(profile, code)
}
