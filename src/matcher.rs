//! Input normalization and constraint matching.
//!
//! Every check in the crate starts by reducing the subject to its digits.
//! Separators, whitespace and anything else that is not `0-9` are dropped;
//! the result is held in a [`Zeroizing`] buffer so it is wiped on drop.

use zeroize::Zeroizing;

use crate::input::CardInput;
use crate::profile::{IdRange, LengthConstraint};

/// Strips every non-digit character from `raw`.
///
/// # Example
///
/// ```
/// use cc_cardtype::matcher::normalize;
///
/// assert_eq!(normalize("4111-1111 1111.1111").as_str(), "4111111111111111");
/// assert_eq!(normalize("abc").as_str(), "");
/// ```
#[inline]
pub fn normalize(raw: &str) -> Zeroizing<String> {
    let mut digits = Zeroizing::new(String::with_capacity(raw.len()));
    digits.extend(raw.chars().filter(char::is_ascii_digit));
    digits
}

/// Normalizes any [`CardInput`].
#[inline]
pub fn normalize_input<N: CardInput + ?Sized>(number: &N) -> Zeroizing<String> {
    let raw = number.raw();
    let digits = normalize(&raw);
    if let std::borrow::Cow::Owned(owned) = raw {
        drop(Zeroizing::new(owned));
    }
    digits
}

/// Returns true if the length of `digits` satisfies any of `lengths`.
#[inline]
pub fn matches_length(lengths: &[LengthConstraint], digits: &str) -> bool {
    let length = digits.len();
    lengths.iter().any(|constraint| constraint.contains(length))
}

/// Returns true if `digits` starts with any of `ranges`.
#[inline]
pub fn matches_id_range(ranges: &[IdRange], digits: &str) -> bool {
    ranges.iter().any(|range| range.matches(digits))
}

/// The range of a profile that matched a number, and how specific it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeMatch {
    /// Number of leading digits the range pins down.
    pub specificity: usize,
    /// The matching range.
    pub range: IdRange,
}

/// Returns the most specific range in `ranges` that `digits` starts with.
///
/// On equal specificity the earlier range is kept.
pub fn matched_id_range(ranges: &[IdRange], digits: &str) -> Option<RangeMatch> {
    let mut best: Option<RangeMatch> = None;
    for range in ranges {
        if !range.matches(digits) {
            continue;
        }
        let specificity = range.specificity();
        if best.map_or(true, |current| specificity > current.specificity) {
            best = Some(RangeMatch {
                specificity,
                range: *range,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("4111 1111 1111 1111").as_str(), "4111111111111111");
        assert_eq!(normalize("4111-1111-1111-1111").as_str(), "4111111111111111");
        assert_eq!(normalize(" 37 82\t82\n246310005 ").as_str(), "378282246310005");
        assert_eq!(normalize("").as_str(), "");
        assert_eq!(normalize("----").as_str(), "");
        // Non-ASCII digits are not card digits.
        assert_eq!(normalize("４１1").as_str(), "1");
    }

    #[test]
    fn test_normalize_input() {
        assert_eq!(normalize_input(&4111111111111111u64).as_str(), "4111111111111111");
        assert_eq!(normalize_input("4111 1111").as_str(), "41111111");
    }

    #[test]
    fn test_matches_length() {
        let lengths = [
            LengthConstraint::Exact(16),
            LengthConstraint::Range { min: 14, max: 15 },
        ];
        assert!(matches_length(&lengths, "1234567890123456"));
        assert!(matches_length(&lengths, "12345678901234"));
        assert!(matches_length(&lengths, "123456789012345"));
        assert!(!matches_length(&lengths, "1234567890123"));
        assert!(!matches_length(&lengths, "12345678901234567"));
        assert!(!matches_length(&[], "1234"));
    }

    #[test]
    fn test_matches_id_range() {
        let ranges = [IdRange::Exact(34), IdRange::Exact(37)];
        assert!(matches_id_range(&ranges, "378282246310005"));
        assert!(matches_id_range(&ranges, "341111111111111"));
        assert!(!matches_id_range(&ranges, "351111111111111"));
    }

    #[test]
    fn test_matched_id_range_prefers_specific() {
        let ranges = [
            IdRange::Range { min: 622126, max: 622925 },
            IdRange::Exact(6011),
            IdRange::Range { min: 644, max: 649 },
            IdRange::Exact(65),
        ];
        let m = matched_id_range(&ranges, "6221260000000000").unwrap();
        assert_eq!(m.specificity, 6);
        assert_eq!(m.range, ranges[0]);

        let m = matched_id_range(&ranges, "6500000000000002").unwrap();
        assert_eq!(m.specificity, 2);

        assert!(matched_id_range(&ranges, "4111111111111111").is_none());
    }

    #[test]
    fn test_id_range_non_ascii_input() {
        let ranges = [IdRange::Range { min: 10, max: 20 }];
        assert!(!matches_id_range(&ranges, "1é"));
        assert!(!matches_id_range(&ranges, "é12"));
        assert!(matched_id_range(&ranges, "1é").is_none());

        let ranges = [IdRange::Range { min: 10, max: 20 }, IdRange::Exact(1)];
        let m = matched_id_range(&ranges, "1é").unwrap();
        assert_eq!(m.range, IdRange::Exact(1));
        assert!(!IdRange::Exact(12).matches("1é"));
    }

    #[test]
    fn test_matched_id_range_first_wins_on_tie() {
        let ranges = [IdRange::Exact(5), IdRange::Range { min: 4, max: 6 }];
        let m = matched_id_range(&ranges, "5000").unwrap();
        assert_eq!(m.range, IdRange::Exact(5));

        let ranges = [IdRange::Exact(5), IdRange::Exact(50)];
        let m = matched_id_range(&ranges, "5000").unwrap();
        assert_eq!(m.range, IdRange::Exact(50));
    }
}
