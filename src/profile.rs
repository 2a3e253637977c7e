//! Card profiles: the matching and display rules for one card type.
//!
//! A [`CardProfile`] describes a card type by data rather than by code:
//! which lengths are valid, which leading digits (IIN/BIN) identify it,
//! how long its security code is, and where spaces go when it is printed.
//! Built-in card types and profiles loaded from schema files share this one
//! representation.
//!
//! Profiles are immutable. All validation of the raw schema values happens
//! once, in [`CardProfileBuilder::build`].
//!
//! # Example
//!
//! ```
//! use cc_cardtype::{CardProfile, DEBIT_CARD};
//!
//! let napas = CardProfile::builder("Napas", "napas")
//!     .kind(DEBIT_CARD)
//!     .breakpoints([4, 8, 12])
//!     .security_code("CVC", 3)
//!     .lengths([16, 19])
//!     .id_ranges([9704])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(napas.kind(), "Debit Card");
//! assert!(napas.matches_length("9704000000000000"));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::checksum::Checksum;
use crate::error::{Attribute, ConstraintContext, ConstraintError, FormatError};
use crate::input::CardInput;

/// Card type label for credit cards. Profiles default to this.
pub const CREDIT_CARD: &str = "Credit Card";

/// Card type label for debit cards.
pub const DEBIT_CARD: &str = "Debit Card";

/// Generic card type label.
pub const DEFAULT_CARD: &str = "Payment Card";

/// Number of decimal digits in `n` (`0` has one digit).
#[inline]
pub(crate) fn digit_width(n: u64) -> usize {
    let mut width = 1;
    let mut rest = n / 10;
    while rest > 0 {
        width += 1;
        rest /= 10;
    }
    width
}

/// A valid card number length: one exact length or an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthConstraint {
    /// Exactly this many digits.
    Exact(usize),
    /// Between `min` and `max` digits, inclusive.
    Range {
        /// Minimum length.
        min: usize,
        /// Maximum length.
        max: usize,
    },
}

impl LengthConstraint {
    /// Returns true if a number of `length` digits satisfies this constraint.
    #[inline]
    pub const fn contains(&self, length: usize) -> bool {
        match *self {
            Self::Exact(exact) => length == exact,
            Self::Range { min, max } => length >= min && length <= max,
        }
    }
}

impl fmt::Display for LengthConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(exact) => write!(f, "{}", exact),
            Self::Range { min, max } => write!(f, "{}-{}", min, max),
        }
    }
}

/// A set of leading digits identifying the issuer.
///
/// An exact prefix matches by digit-wise comparison. A range matches when
/// the number's leading digits, taken to the width of the wider bound,
/// fall between the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdRange {
    /// A single prefix, e.g. `4` for Visa.
    Exact(u64),
    /// A closed range of prefixes, e.g. `2221..=2720`.
    Range {
        /// Lowest prefix.
        min: u64,
        /// Highest prefix.
        max: u64,
    },
}

impl IdRange {
    /// Returns true if the leading digits of `digits` fall in this range.
    ///
    /// Non-digit input never panics; it simply fails to match.
    pub fn matches(&self, digits: &str) -> bool {
        match *self {
            Self::Exact(prefix) => {
                let prefix = prefix.to_string();
                let width = prefix.len().min(digits.len());
                digits.as_bytes()[..width] == prefix.as_bytes()[..width]
            }
            Self::Range { min, max } => {
                let width = digit_width(min).max(digit_width(max)).min(digits.len());
                if width == 0 {
                    return false;
                }
                match digits.get(..width).map(str::parse::<u64>) {
                    Some(Ok(value)) => value >= min && value <= max,
                    _ => false,
                }
            }
        }
    }

    /// Returns how many leading digits this range pins down.
    ///
    /// An exact prefix counts its own digits; a range counts the digits of
    /// its narrower bound.
    #[inline]
    pub fn specificity(&self) -> usize {
        match *self {
            Self::Exact(prefix) => digit_width(prefix),
            Self::Range { min, max } => digit_width(min).min(digit_width(max)),
        }
    }

    /// Returns true if either bound, written out in digits, starts with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        match *self {
            Self::Exact(value) => value.to_string().starts_with(prefix),
            Self::Range { min, max } => {
                min.to_string().starts_with(prefix) || max.to_string().starts_with(prefix)
            }
        }
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(prefix) => write!(f, "{}", prefix),
            Self::Range { min, max } => write!(f, "{}-{}", min, max),
        }
    }
}

/// The security code printed on a card (CVV, CVC, CID...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecurityCode {
    label: String,
    length: usize,
}

impl SecurityCode {
    /// Returns the code's name, e.g. "CVV".
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the exact number of digits the code has.
    #[inline]
    pub const fn length(&self) -> usize {
        self.length
    }
}

impl fmt::Display for SecurityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} digits)", self.label, self.length)
    }
}

/// A single size value from a profile schema: an integer or a digit string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize), serde(untagged))]
pub enum SizeValue {
    /// An integer value.
    Int(i64),
    /// A textual value; must contain digits only.
    Text(String),
}

impl SizeValue {
    fn resolve(&self, context: &ConstraintContext) -> Result<u64, ConstraintError> {
        match self {
            Self::Int(value) => u64::try_from(*value).map_err(|_| ConstraintError::NotPositive {
                context: context.clone(),
                value: *value,
            }),
            Self::Text(text) => {
                let not_numeric = || ConstraintError::NotNumeric {
                    context: context.clone(),
                    value: text.clone(),
                };
                if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(not_numeric());
                }
                text.parse().map_err(|_| not_numeric())
            }
        }
    }
}

impl From<i32> for SizeValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for SizeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for SizeValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for SizeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SizeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A constraint entry from a profile schema: a single value or a `[min, max]` pair.
///
/// `Pair` holds whatever the schema supplied; anything but exactly two
/// elements is rejected when the profile is built.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize), serde(untagged))]
pub enum RawSize {
    /// A single value.
    Single(SizeValue),
    /// A range, expected to be `[min, max]`.
    Pair(Vec<SizeValue>),
}

macro_rules! impl_raw_size_from_single {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RawSize {
                fn from(value: $ty) -> Self {
                    Self::Single(value.into())
                }
            }
        )*
    };
}

impl_raw_size_from_single!(i32, i64, u32, &str, String);

impl From<SizeValue> for RawSize {
    fn from(value: SizeValue) -> Self {
        Self::Single(value)
    }
}

impl From<[i32; 2]> for RawSize {
    fn from([min, max]: [i32; 2]) -> Self {
        Self::Pair(vec![min.into(), max.into()])
    }
}

impl From<[i64; 2]> for RawSize {
    fn from([min, max]: [i64; 2]) -> Self {
        Self::Pair(vec![min.into(), max.into()])
    }
}

impl From<Vec<SizeValue>> for RawSize {
    fn from(values: Vec<SizeValue>) -> Self {
        Self::Pair(values)
    }
}

impl From<LengthConstraint> for RawSize {
    fn from(constraint: LengthConstraint) -> Self {
        match constraint {
            LengthConstraint::Exact(exact) => Self::Single(SizeValue::Int(exact as i64)),
            LengthConstraint::Range { min, max } => {
                Self::Pair(vec![SizeValue::Int(min as i64), SizeValue::Int(max as i64)])
            }
        }
    }
}

impl From<IdRange> for RawSize {
    fn from(range: IdRange) -> Self {
        match range {
            IdRange::Exact(prefix) => Self::Single(SizeValue::Text(prefix.to_string())),
            IdRange::Range { min, max } => Self::Pair(vec![
                SizeValue::Text(min.to_string()),
                SizeValue::Text(max.to_string()),
            ]),
        }
    }
}

impl RawSize {
    /// Resolves this entry into a single value or a validated `(min, max)` pair.
    fn resolve(&self, context: &ConstraintContext) -> Result<Resolved, ConstraintError> {
        match self {
            Self::Single(value) => value.resolve(context).map(Resolved::Single),
            Self::Pair(values) => {
                if values.len() != 2 {
                    return Err(ConstraintError::NotAPair {
                        context: context.clone(),
                        elements: values.len(),
                    });
                }
                let min = values[0].resolve(context)?;
                let max = values[1].resolve(context)?;
                if min >= max {
                    return Err(ConstraintError::MinNotLessThanMax {
                        context: context.clone(),
                        min,
                        max,
                    });
                }
                Ok(Resolved::Pair(min, max))
            }
        }
    }
}

enum Resolved {
    Single(u64),
    Pair(u64, u64),
}

/// One card type's matching rules and display rules.
///
/// Cheap to share: clone it, or hold references to it from any number of
/// threads. A profile may carry its own checksum, which then takes precedence
/// over the one the [`Validator`](crate::Validator) was given.
#[derive(Clone)]
pub struct CardProfile {
    kind: String,
    name: String,
    alias: String,
    breakpoints: Vec<usize>,
    security_code: SecurityCode,
    lengths: Vec<LengthConstraint>,
    id_ranges: Vec<IdRange>,
    needs_checksum: bool,
    checksum: Option<Arc<dyn Checksum>>,
}

impl CardProfile {
    /// Starts building a profile with the given display name and alias.
    pub fn builder(name: impl Into<String>, alias: impl Into<String>) -> CardProfileBuilder {
        CardProfileBuilder::new(name, alias)
    }

    /// Assembles a profile from already-validated parts.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        kind: &str,
        name: &str,
        alias: &str,
        breakpoints: &[usize],
        code: (&str, usize),
        lengths: &[LengthConstraint],
        id_ranges: &[IdRange],
        needs_checksum: bool,
    ) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            alias: alias.to_string(),
            breakpoints: breakpoints.to_vec(),
            security_code: SecurityCode {
                label: code.0.to_string(),
                length: code.1,
            },
            lengths: lengths.to_vec(),
            id_ranges: id_ranges.to_vec(),
            needs_checksum,
            checksum: None,
        }
    }

    /// Returns the card type label, e.g. "Credit Card".
    #[inline]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the human-readable name, e.g. "American Express".
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the machine key, e.g. "american-express".
    #[inline]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the cumulative offsets at which a space is inserted.
    #[inline]
    pub fn breakpoints(&self) -> &[usize] {
        &self.breakpoints
    }

    /// Returns the security code description.
    #[inline]
    pub fn security_code(&self) -> &SecurityCode {
        &self.security_code
    }

    /// Returns the valid number lengths.
    #[inline]
    pub fn lengths(&self) -> &[LengthConstraint] {
        &self.lengths
    }

    /// Returns the issuer identification ranges.
    #[inline]
    pub fn id_ranges(&self) -> &[IdRange] {
        &self.id_ranges
    }

    /// Returns true if the checksum should be consulted for this card type.
    #[inline]
    pub const fn needs_checksum(&self) -> bool {
        self.needs_checksum
    }

    /// Returns the profile's own checksum, if it carries one.
    #[inline]
    pub fn checksum(&self) -> Option<&dyn Checksum> {
        self.checksum.as_deref()
    }

    /// Returns true if the length of `digits` satisfies any length constraint.
    #[inline]
    pub fn matches_length(&self, digits: &str) -> bool {
        crate::matcher::matches_length(&self.lengths, digits)
    }

    /// Returns true if `digits` starts with any of this profile's ranges.
    #[inline]
    pub fn matches_id_range(&self, digits: &str) -> bool {
        crate::matcher::matches_id_range(&self.id_ranges, digits)
    }

    /// Validates a card number against this profile with the default validator.
    ///
    /// See [`Validator::is_number_valid`](crate::Validator::is_number_valid).
    pub fn is_number_valid<N: CardInput + ?Sized>(&self, number: &N) -> bool {
        crate::validate::is_number_valid(self, number)
    }

    /// Returns true if `code` has exactly this profile's security code length.
    pub fn is_code_valid<C: CardInput + ?Sized>(&self, code: &C) -> bool {
        crate::validate::is_code_valid(self, code)
    }

    /// Formats a card number with this profile's breakpoints.
    ///
    /// See [`format::format`](crate::format::format).
    pub fn format<N: CardInput + ?Sized>(&self, number: &N) -> Result<String, FormatError> {
        crate::format::format(self, number)
    }
}

impl fmt::Debug for CardProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardProfile")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("breakpoints", &self.breakpoints)
            .field("security_code", &self.security_code)
            .field("lengths", &self.lengths)
            .field("id_ranges", &self.id_ranges)
            .field("needs_checksum", &self.needs_checksum)
            .field("checksum", &self.checksum.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}

impl fmt::Display for CardProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

impl PartialEq for CardProfile {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.alias == other.alias
            && self.breakpoints == other.breakpoints
            && self.security_code == other.security_code
            && self.lengths == other.lengths
            && self.id_ranges == other.id_ranges
            && self.needs_checksum == other.needs_checksum
            && self.checksum.as_ref().map(|c| c.name().to_string())
                == other.checksum.as_ref().map(|c| c.name().to_string())
    }
}

impl Eq for CardProfile {}

/// Builds a [`CardProfile`] from raw schema values, validating each constraint.
///
/// The card type label (see [`kind`](Self::kind)) is used as the context of
/// any [`ConstraintError`] raised by [`build`](Self::build).
#[derive(Clone)]
pub struct CardProfileBuilder {
    kind: String,
    name: String,
    alias: String,
    breakpoints: Option<Vec<SizeValue>>,
    code: Option<(String, i64)>,
    lengths: Vec<RawSize>,
    id_ranges: Vec<RawSize>,
    needs_checksum: bool,
    checksum: Option<Arc<dyn Checksum>>,
}

impl CardProfileBuilder {
    /// Creates a builder for a credit card with checksum validation enabled.
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            kind: CREDIT_CARD.to_string(),
            name: name.into(),
            alias: alias.into(),
            breakpoints: None,
            code: None,
            lengths: Vec::new(),
            id_ranges: Vec::new(),
            needs_checksum: true,
            checksum: None,
        }
    }

    /// Sets the card type label, e.g. [`DEBIT_CARD`].
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Sets the display breakpoints.
    pub fn breakpoints<I, V>(mut self, breakpoints: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SizeValue>,
    {
        self.breakpoints = Some(breakpoints.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the security code label and length.
    pub fn security_code(mut self, label: impl Into<String>, length: i64) -> Self {
        self.code = Some((label.into(), length));
        self
    }

    /// Sets the valid lengths.
    pub fn lengths<I, S>(mut self, lengths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<RawSize>,
    {
        self.lengths = lengths.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the issuer identification ranges.
    pub fn id_ranges<I, S>(mut self, id_ranges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<RawSize>,
    {
        self.id_ranges = id_ranges.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables checksum validation for this card type.
    pub fn needs_checksum(mut self, needs_checksum: bool) -> Self {
        self.needs_checksum = needs_checksum;
        self
    }

    /// Gives the profile its own checksum implementation.
    pub fn checksum(mut self, checksum: impl Checksum + 'static) -> Self {
        self.checksum = Some(Arc::new(checksum));
        self
    }

    /// Gives the profile a shared checksum implementation.
    pub fn shared_checksum(mut self, checksum: Arc<dyn Checksum>) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// Validates every constraint and builds the profile.
    pub fn build(self) -> Result<CardProfile, ConstraintError> {
        let context = |attribute| ConstraintContext::new(self.kind.as_str(), attribute);

        let breakpoints = match &self.breakpoints {
            Some(values) => resolve_breakpoints(values, &context(Attribute::Breakpoint))?,
            None => Vec::new(),
        };
        let security_code = resolve_code(self.code.as_ref(), &context(Attribute::SecurityCode))?;
        let lengths = resolve_lengths(&self.lengths, &context(Attribute::Length))?;
        let id_ranges = resolve_id_ranges(&self.id_ranges, &context(Attribute::IdRange))?;

        Ok(CardProfile {
            kind: self.kind,
            name: self.name,
            alias: self.alias,
            breakpoints,
            security_code,
            lengths,
            id_ranges,
            needs_checksum: self.needs_checksum,
            checksum: self.checksum,
        })
    }
}

impl fmt::Debug for CardProfileBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardProfileBuilder")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

fn resolve_breakpoints(
    values: &[SizeValue],
    context: &ConstraintContext,
) -> Result<Vec<usize>, ConstraintError> {
    if values.is_empty() {
        return Err(ConstraintError::Empty {
            context: context.clone(),
        });
    }

    let mut breakpoints = Vec::with_capacity(values.len());
    let mut previous = 0usize;
    for value in values {
        let value = value.resolve(context)? as usize;
        if value <= previous {
            return Err(ConstraintError::NotIncreasing {
                context: context.clone(),
                previous,
                value,
            });
        }
        breakpoints.push(value);
        previous = value;
    }
    Ok(breakpoints)
}

fn resolve_code(
    code: Option<&(String, i64)>,
    context: &ConstraintContext,
) -> Result<SecurityCode, ConstraintError> {
    let (label, length) = code.ok_or_else(|| ConstraintError::Empty {
        context: context.clone(),
    })?;
    match *length {
        0 => Err(ConstraintError::ZeroLengthCode {
            context: context.clone(),
        }),
        n if n < 0 => Err(ConstraintError::NotPositive {
            context: context.clone(),
            value: n,
        }),
        n => Ok(SecurityCode {
            label: label.clone(),
            length: n as usize,
        }),
    }
}

fn resolve_lengths(
    values: &[RawSize],
    context: &ConstraintContext,
) -> Result<Vec<LengthConstraint>, ConstraintError> {
    if values.is_empty() {
        return Err(ConstraintError::Empty {
            context: context.clone(),
        });
    }

    values
        .iter()
        .map(|value| match value.resolve(context)? {
            Resolved::Single(exact) => Ok(LengthConstraint::Exact(exact as usize)),
            Resolved::Pair(0, _) => Err(ConstraintError::NotPositive {
                context: context.clone(),
                value: 0,
            }),
            Resolved::Pair(min, max) => Ok(LengthConstraint::Range {
                min: min as usize,
                max: max as usize,
            }),
        })
        .collect()
}

fn resolve_id_ranges(
    values: &[RawSize],
    context: &ConstraintContext,
) -> Result<Vec<IdRange>, ConstraintError> {
    if values.is_empty() {
        return Err(ConstraintError::Empty {
            context: context.clone(),
        });
    }

    values
        .iter()
        .map(|value| match value.resolve(context)? {
            Resolved::Single(prefix) => Ok(IdRange::Exact(prefix)),
            Resolved::Pair(min, max) => Ok(IdRange::Range { min, max }),
        })
        .collect()
}
