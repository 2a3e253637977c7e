//! Error types for card profile construction, resolution and formatting.
//!
//! Every error carries the context it was raised in (card type label and
//! attribute) explicitly, so messages read like
//! `"Credit Card length minimum value must be less than maximum value"`.
//! None of the messages ever contain a card number.

use std::fmt;

/// The profile attribute a constraint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Valid card number lengths.
    Length,
    /// Issuer identification number ranges.
    IdRange,
    /// Display breakpoints.
    Breakpoint,
    /// Security code length.
    SecurityCode,
}

impl Attribute {
    /// Returns the schema key for this attribute.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::IdRange => "idRange",
            Self::Breakpoint => "breakpoint",
            Self::SecurityCode => "code",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Where a constraint error was raised: which card type, which attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintContext {
    /// Card type label, e.g. "Credit Card".
    pub card_type: String,
    /// The attribute being processed.
    pub attribute: Attribute,
}

impl ConstraintContext {
    /// Creates a new context.
    pub fn new(card_type: impl Into<String>, attribute: Attribute) -> Self {
        Self {
            card_type: card_type.into(),
            attribute,
        }
    }
}

impl fmt::Display for ConstraintContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.card_type, self.attribute)
    }
}

/// A profile constraint is malformed.
///
/// Raised only while a [`CardProfile`](crate::CardProfile) is being built.
/// Resolution and validation never produce this error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// The constraint list has no elements.
    Empty {
        /// Where the error was raised.
        context: ConstraintContext,
    },

    /// A range constraint did not have exactly two elements.
    NotAPair {
        /// Where the error was raised.
        context: ConstraintContext,
        /// Number of elements given.
        elements: usize,
    },

    /// A size value was negative, or a length range started at zero.
    NotPositive {
        /// Where the error was raised.
        context: ConstraintContext,
        /// The offending value.
        value: i64,
    },

    /// A range minimum was not strictly less than its maximum.
    MinNotLessThanMax {
        /// Where the error was raised.
        context: ConstraintContext,
        /// Range minimum.
        min: u64,
        /// Range maximum.
        max: u64,
    },

    /// A textual size value was not made of digits only.
    NotNumeric {
        /// Where the error was raised.
        context: ConstraintContext,
        /// The offending value.
        value: String,
    },

    /// The security code length was zero.
    ZeroLengthCode {
        /// Where the error was raised.
        context: ConstraintContext,
    },

    /// Breakpoints were zero or not strictly increasing.
    NotIncreasing {
        /// Where the error was raised.
        context: ConstraintContext,
        /// The preceding breakpoint (0 for the first one).
        previous: usize,
        /// The offending breakpoint.
        value: usize,
    },
}

impl ConstraintError {
    /// Returns the context the error was raised in.
    pub fn context(&self) -> &ConstraintContext {
        match self {
            Self::Empty { context }
            | Self::NotAPair { context, .. }
            | Self::NotPositive { context, .. }
            | Self::MinNotLessThanMax { context, .. }
            | Self::NotNumeric { context, .. }
            | Self::ZeroLengthCode { context }
            | Self::NotIncreasing { context, .. } => context,
        }
    }
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { context } => {
                write!(f, "{} must have at least one element", context)
            }

            Self::NotAPair { context, elements } => {
                write!(
                    f,
                    "{} value must only be of two elements in an array, got {}",
                    context, elements
                )
            }

            Self::NotPositive { context, value } => {
                write!(
                    f,
                    "{} minimum value must be a positive integer, got {}",
                    context, value
                )
            }

            Self::MinNotLessThanMax { context, min, max } => {
                write!(
                    f,
                    "{} minimum value must be less than maximum value, got [{}, {}]",
                    context, min, max
                )
            }

            Self::NotNumeric { context, value } => {
                write!(
                    f,
                    "{} must be between [0-9] as either a string or an integer, got \"{}\"",
                    context,
                    value.escape_default()
                )
            }

            Self::ZeroLengthCode { context } => {
                write!(f, "{} length must be at least 1", context)
            }

            Self::NotIncreasing {
                context,
                previous,
                value,
            } => {
                write!(
                    f,
                    "{} values must be positive and strictly increasing, got {} after {}",
                    context, value, previous
                )
            }
        }
    }
}

impl std::error::Error for ConstraintError {}

/// Resolution could not run.
///
/// A number that matches no profile is not an error; the resolver
/// returns `Ok(None)` for that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// There are no candidate profiles to resolve against.
    NoProfiles,

    /// A profile alias is already present in the active profile set.
    DuplicateAlias {
        /// The repeated alias.
        alias: String,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProfiles => {
                write!(f, "no card profiles registered to resolve the card number from")
            }
            Self::DuplicateAlias { alias } => {
                write!(f, "card profile alias \"{}\" is already registered", alias)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// A card number could not be formatted with a profile's breakpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The profile has no breakpoints.
    NoBreakpoints {
        /// Card type label of the profile.
        card_type: String,
    },

    /// The number is shorter than the last breakpoint.
    TooShort {
        /// Card type label of the profile.
        card_type: String,
        /// Digits provided.
        length: usize,
        /// Digits required by the breakpoints.
        minimum: usize,
    },

    /// The generated grouping pattern could not be compiled or applied.
    Pattern {
        /// Card type label of the profile.
        card_type: String,
        /// Why the pattern failed.
        reason: String,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBreakpoints { card_type } => {
                write!(f, "{} has no breakpoints to format the number with", card_type)
            }
            Self::TooShort {
                card_type,
                length,
                minimum,
            } => {
                write!(
                    f,
                    "{} number of {} digits could not be formatted: breakpoints need at least {}",
                    card_type, length, minimum
                )
            }
            Self::Pattern { card_type, reason } => {
                write!(
                    f,
                    "{} number could not be formatted according to the provided breakpoints: {}",
                    card_type, reason
                )
            }
        }
    }
}

impl std::error::Error for FormatError {}
