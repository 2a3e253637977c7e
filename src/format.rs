//! Card number formatting for display.
//!
//! A profile's breakpoints are cumulative offsets: `[4, 8, 12]` puts a
//! space before the 5th, 9th and 13th digit. Digits past the last breakpoint
//! stay together as one final group.
//!
//! Two equivalent strategies are provided. [`format`] walks the digits once
//! and inserts separators from a queue of breakpoints. [`format_with_pattern`]
//! compiles the breakpoints into a grouping regex (see [`BreakpointPattern`])
//! and substitutes the groups. Both produce the same output.
//!
//! # Example
//!
//! ```
//! use cc_cardtype::catalog;
//! use cc_cardtype::format::{format, format_with_separator};
//!
//! let visa = catalog::find("visa").unwrap();
//! assert_eq!(format(visa, "4111111111111111").unwrap(), "4111 1111 1111 1111");
//! assert_eq!(
//!     format_with_separator(visa, "4111111111111111", "-").unwrap(),
//!     "4111-1111-1111-1111"
//! );
//!
//! let amex = catalog::find("american-express").unwrap();
//! assert_eq!(format(amex, "378282246310005").unwrap(), "3782 822463 10005");
//! ```

use std::collections::VecDeque;

use regex::Regex;

use crate::error::FormatError;
use crate::input::CardInput;
use crate::matcher::normalize_input;
use crate::profile::CardProfile;

/// Formats a card number with spaces at the profile's breakpoints.
///
/// # Errors
///
/// [`FormatError::NoBreakpoints`] if the profile has none, and
/// [`FormatError::TooShort`] if the number has fewer digits than the last
/// breakpoint.
pub fn format<N: CardInput + ?Sized>(profile: &CardProfile, number: &N) -> Result<String, FormatError> {
    format_with_separator(profile, number, " ")
}

/// Formats a card number with a custom separator at the profile's breakpoints.
pub fn format_with_separator<N: CardInput + ?Sized>(
    profile: &CardProfile,
    number: &N,
    separator: &str,
) -> Result<String, FormatError> {
    let digits = normalize_input(number);
    check_length(profile, digits.len())?;

    let mut pending: VecDeque<usize> = profile.breakpoints().iter().copied().collect();
    let mut result =
        String::with_capacity(digits.len() + pending.len() * separator.len());

    for (index, digit) in digits.chars().enumerate() {
        if pending.front() == Some(&index) {
            result.push_str(separator);
            pending.pop_front();
        }
        result.push(digit);
    }

    Ok(result)
}

/// Splits a card number into its display groups.
///
/// ```
/// use cc_cardtype::catalog;
/// use cc_cardtype::format::split_into_groups;
///
/// let amex = catalog::find("american-express").unwrap();
/// assert_eq!(
///     split_into_groups(amex, "378282246310005").unwrap(),
///     vec!["3782", "822463", "10005"]
/// );
/// ```
pub fn split_into_groups<N: CardInput + ?Sized>(
    profile: &CardProfile,
    number: &N,
) -> Result<Vec<String>, FormatError> {
    let digits = normalize_input(number);
    check_length(profile, digits.len())?;

    let mut groups = Vec::with_capacity(profile.breakpoints().len() + 1);
    let mut start = 0;
    for &end in profile.breakpoints() {
        groups.push(digits[start..end].to_string());
        start = end;
    }
    if start < digits.len() {
        groups.push(digits[start..].to_string());
    }
    Ok(groups)
}

/// Strips all formatting from a card number, leaving only digits.
///
/// ```
/// use cc_cardtype::format::strip_formatting;
///
/// assert_eq!(strip_formatting("4111 1111 1111 1111"), "4111111111111111");
/// assert_eq!(strip_formatting("4111-1111-1111-1111"), "4111111111111111");
/// ```
pub fn strip_formatting(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formats a card number through a compiled [`BreakpointPattern`].
///
/// Same output and errors as [`format`].
pub fn format_with_pattern<N: CardInput + ?Sized>(
    profile: &CardProfile,
    number: &N,
) -> Result<String, FormatError> {
    let digits = normalize_input(number);
    let pattern = BreakpointPattern::new(profile, digits.len())?;
    pattern.apply(&digits)
}

fn check_length(profile: &CardProfile, length: usize) -> Result<(), FormatError> {
    let minimum = *profile
        .breakpoints()
        .last()
        .ok_or_else(|| FormatError::NoBreakpoints {
            card_type: profile.kind().to_string(),
        })?;
    if length < minimum {
        return Err(FormatError::TooShort {
            card_type: profile.kind().to_string(),
            length,
            minimum,
        });
    }
    Ok(())
}

/// A grouping regex built from a profile's breakpoints for one input length.
///
/// Each breakpoint becomes a fixed-width capture group; a number longer than
/// the last breakpoint gets one more group holding the remainder. The
/// replacement joins the captures with single spaces.
///
/// ```
/// use cc_cardtype::catalog;
/// use cc_cardtype::format::BreakpointPattern;
///
/// let amex = catalog::find("american-express").unwrap();
/// let pattern = BreakpointPattern::new(amex, 15).unwrap();
/// assert_eq!(pattern.pattern(), r"^(\d{4})(\d{6})(\d{5})$");
/// assert_eq!(pattern.replacement(), "${1} ${2} ${3}");
/// assert_eq!(pattern.apply("378282246310005").unwrap(), "3782 822463 10005");
/// ```
#[derive(Debug, Clone)]
pub struct BreakpointPattern {
    card_type: String,
    regex: Regex,
    replacement: String,
}

impl BreakpointPattern {
    /// Builds the pattern for numbers of `length` digits.
    ///
    /// # Errors
    ///
    /// Same conditions as [`format`], plus [`FormatError::Pattern`] if the
    /// regex fails to compile.
    pub fn new(profile: &CardProfile, length: usize) -> Result<Self, FormatError> {
        check_length(profile, length)?;

        let mut widths = Vec::with_capacity(profile.breakpoints().len() + 1);
        let mut previous = 0;
        for &breakpoint in profile.breakpoints() {
            widths.push(breakpoint - previous);
            previous = breakpoint;
        }
        if length > previous {
            widths.push(length - previous);
        }

        let mut pattern = String::from("^");
        for width in &widths {
            pattern.push_str(&format!(r"(\d{{{}}})", width));
        }
        pattern.push('$');

        let replacement = (1..=widths.len())
            .map(|group| format!("${{{}}}", group))
            .collect::<Vec<_>>()
            .join(" ");

        let regex = Regex::new(&pattern).map_err(|e| FormatError::Pattern {
            card_type: profile.kind().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            card_type: profile.kind().to_string(),
            regex,
            replacement,
        })
    }

    /// Returns the regex source.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns the replacement template.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Applies the pattern to normalized digits.
    ///
    /// # Errors
    ///
    /// [`FormatError::Pattern`] if `digits` does not fit the pattern, e.g.
    /// because its length differs from the one the pattern was built for.
    pub fn apply(&self, digits: &str) -> Result<String, FormatError> {
        if !self.regex.is_match(digits) {
            return Err(FormatError::Pattern {
                card_type: self.card_type.clone(),
                reason: format!("{} digits do not fit the grouping pattern", digits.len()),
            });
        }
        Ok(self
            .regex
            .replace(digits, self.replacement.as_str())
            .into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find;

    fn with_breakpoints(breakpoints: &[i64]) -> CardProfile {
        CardProfile::builder("Test", "test")
            .breakpoints(breakpoints.iter().copied())
            .security_code("CVV", 3)
            .lengths([[12, 19]])
            .id_ranges([1])
            .build()
            .unwrap()
    }

    #[test]
    fn test_format_cases() {
        let cases: &[(&[i64], &str, &str)] = &[
            (&[5, 10, 13], "1234567891012345", "12345 67891 012 345"),
            (&[3, 9], "123456789101998", "123 456789 101998"),
            (&[4, 8, 12], "123456789101", "1234 5678 9101"),
            (&[2, 4, 6], "123456", "12 34 56"),
            (&[3, 6, 8, 12, 14], "3336669991005557777", "333 666 99 9100 55 57777"),
        ];
        for (breakpoints, input, expected) in cases {
            let profile = with_breakpoints(breakpoints);
            assert_eq!(format(&profile, *input).unwrap(), *expected);
            assert_eq!(format_with_pattern(&profile, *input).unwrap(), *expected);
        }
    }

    #[test]
    fn test_format_catalog_profiles() {
        let visa = find("visa").unwrap();
        assert_eq!(format(visa, "4111111111111111").unwrap(), "4111 1111 1111 1111");
        assert_eq!(format(visa, &4111111111111111u64).unwrap(), "4111 1111 1111 1111");

        let amex = find("american-express").unwrap();
        assert_eq!(format(amex, "3782-822463-10005").unwrap(), "3782 822463 10005");

        let diners = find("diners-club").unwrap();
        assert_eq!(format(diners, "30569309025904").unwrap(), "3056 930902 5904");
    }

    #[test]
    fn test_format_too_short() {
        let visa = find("visa").unwrap();
        let err = format(visa, "41111111111").unwrap_err();
        assert_eq!(
            err,
            FormatError::TooShort {
                card_type: "Credit Card".to_string(),
                length: 11,
                minimum: 12
            }
        );
        assert!(format_with_pattern(visa, "41111111111").is_err());
        assert!(format(visa, "").is_err());
    }

    #[test]
    fn test_format_without_breakpoints() {
        let profile = CardProfile::builder("Humo", "humo")
            .kind("Debit Card")
            .security_code("CVV", 3)
            .lengths([16])
            .id_ranges([9860])
            .build()
            .unwrap();
        let err = format(&profile, "9860000000000000").unwrap_err();
        assert_eq!(
            err,
            FormatError::NoBreakpoints {
                card_type: "Debit Card".to_string()
            }
        );
        assert!(matches!(
            format_with_pattern(&profile, "9860000000000000"),
            Err(FormatError::NoBreakpoints { .. })
        ));
    }

    #[test]
    fn test_format_with_separator() {
        let visa = find("visa").unwrap();
        assert_eq!(
            format_with_separator(visa, "4111111111111111", " - ").unwrap(),
            "4111 - 1111 - 1111 - 1111"
        );
        assert_eq!(
            format_with_separator(visa, "4111111111111111", "").unwrap(),
            "4111111111111111"
        );
    }

    #[test]
    fn test_split_into_groups() {
        let profile = with_breakpoints(&[4, 8, 12]);
        assert_eq!(
            split_into_groups(&profile, "4111111111111111").unwrap(),
            vec!["4111", "1111", "1111", "1111"]
        );
        assert_eq!(
            split_into_groups(&profile, "123456789101").unwrap(),
            vec!["1234", "5678", "9101"]
        );
    }

    #[test]
    fn test_reformat_is_stable() {
        let visa = find("visa").unwrap();
        let once = format(visa, "4111111111111111").unwrap();
        let twice = format(visa, &strip_formatting(&once)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_pattern_shape() {
        let profile = with_breakpoints(&[4, 8, 12]);
        let exact = BreakpointPattern::new(&profile, 12).unwrap();
        assert_eq!(exact.pattern(), r"^(\d{4})(\d{4})(\d{4})$");
        assert_eq!(exact.replacement(), "${1} ${2} ${3}");

        let longer = BreakpointPattern::new(&profile, 19).unwrap();
        assert_eq!(longer.pattern(), r"^(\d{4})(\d{4})(\d{4})(\d{7})$");
        assert_eq!(longer.replacement(), "${1} ${2} ${3} ${4}");
    }

    #[test]
    fn test_pattern_rejects_other_lengths() {
        let profile = with_breakpoints(&[4, 8, 12]);
        let pattern = BreakpointPattern::new(&profile, 16).unwrap();
        assert!(matches!(
            pattern.apply("41111111111111111"),
            Err(FormatError::Pattern { .. })
        ));
    }

    #[test]
    fn test_strip_formatting() {
        assert_eq!(strip_formatting("4111 1111 1111 1111"), "4111111111111111");
        assert_eq!(strip_formatting("4111.1111.1111.1111"), "4111111111111111");
        assert_eq!(strip_formatting("abc"), "");
    }
}
