//! Property-based tests using proptest.
//!
//! These tests verify invariants that should hold for all inputs,
//! helping discover edge cases that manual tests might miss.

use proptest::prelude::*;
use cc_cardtype::{
    catalog, resolve,
    checksum::{Checksum, Luhn},
    format::{format_with_pattern, strip_formatting},
    matcher::{matched_id_range, matches_length, normalize},
    BatchResolver, CardProfile, IdRange, LengthConstraint, Resolver, Validator,
};

// =============================================================================
// STRATEGIES
// =============================================================================

/// Generates a random digit string of a given length.
fn digit_string(len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(prop::char::range('0', '9'), len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generates a random digit string of a length within range.
fn digit_string_range(range: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = String> {
    range.prop_flat_map(digit_string)
}

/// Appends random digits to `prefix` and a Luhn check digit, for `len` digits in total.
fn luhn_number(prefix: String, len: usize) -> impl Strategy<Value = String> {
    digit_string(len - prefix.len() - 1).prop_map(move |body| {
        let partial = format!("{}{}", prefix, body);
        let check = Luhn::check_digit(&partial);
        format!("{}{}", partial, check)
    })
}

/// Picks one of the built-in profiles.
fn default_profile() -> impl Strategy<Value = &'static CardProfile> {
    let profiles = catalog::default_profiles();
    (0..profiles.len()).prop_map(move |index| &profiles[index])
}

/// Generates strictly increasing breakpoints.
fn breakpoints() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(1i64..6, 1..5).prop_map(|steps| {
        steps
            .into_iter()
            .scan(0, |total, step| {
                *total += step;
                Some(*total)
            })
            .collect()
    })
}

/// Mixes separators into a digit string.
fn with_separators(card: String) -> impl Strategy<Value = String> {
    let len = card.len();
    proptest::collection::vec(prop_oneof![Just(""), Just(" "), Just("-"), Just(" - ")], len)
        .prop_map(move |seps| {
            card.chars()
                .zip(seps)
                .map(|(c, sep)| format!("{}{}", sep, c))
                .collect()
        })
}

// =============================================================================
// LENGTH CONSTRAINT PROPERTIES
// =============================================================================

proptest! {
    /// Property: An exact constraint matches exactly one length.
    #[test]
    fn exact_length_matches_only_its_length(digits in digit_string_range(0..=25), length in 1usize..25) {
        let matched = matches_length(&[LengthConstraint::Exact(length)], &digits);
        prop_assert_eq!(matched, digits.len() == length);
    }

    /// Property: A range constraint matches every length between its bounds.
    #[test]
    fn range_length_matches_inclusive_bounds(
        digits in digit_string_range(0..=25),
        min in 1usize..15,
        span in 1usize..10,
    ) {
        let max = min + span;
        let matched = matches_length(&[LengthConstraint::Range { min, max }], &digits);
        prop_assert_eq!(matched, min <= digits.len() && digits.len() <= max);
    }

    /// Property: A list of constraints matches if any one of them does.
    #[test]
    fn length_list_is_disjunction(digits in digit_string_range(0..=25), a in 1usize..25, b in 1usize..25) {
        let both = [LengthConstraint::Exact(a), LengthConstraint::Exact(b)];
        prop_assert_eq!(
            matches_length(&both, &digits),
            matches_length(&both[..1], &digits) || matches_length(&both[1..], &digits)
        );
    }
}

// =============================================================================
// ID RANGE PROPERTIES
// =============================================================================

proptest! {
    /// Property: A number always matches its own leading digits as a prefix.
    #[test]
    fn number_matches_own_prefix(digits in digit_string_range(1..=19), width in 1usize..7) {
        let width = width.min(digits.len());
        let leading = &digits[..width];
        prop_assume!(!leading.starts_with('0'));
        let prefix: u64 = leading.parse().unwrap();
        let range = IdRange::Exact(prefix);
        prop_assert!(range.matches(&digits));

        let matched = matched_id_range(&[range], &digits).unwrap();
        prop_assert_eq!(matched.specificity, width);
    }

    /// Property: The reported specificity is the best among matching ranges.
    #[test]
    fn matched_specificity_is_maximal(digits in digit_string_range(6..=19)) {
        let ranges = [
            IdRange::Exact(digits[..1].parse().unwrap()),
            IdRange::Range { min: 0, max: 99 },
            IdRange::Exact(digits[..4].parse().unwrap()),
        ];
        prop_assume!(!digits.starts_with('0'));
        let matched = matched_id_range(&ranges, &digits).unwrap();
        let best = ranges
            .iter()
            .filter(|r| r.matches(&digits))
            .map(IdRange::specificity)
            .max()
            .unwrap();
        prop_assert_eq!(matched.specificity, best);
        prop_assert_eq!(matched.specificity, 4);
    }
}

// =============================================================================
// FORMATTING PROPERTIES
// =============================================================================

proptest! {
    /// Property: Reformatting a formatted number changes nothing.
    #[test]
    fn format_is_idempotent(profile in default_profile(), digits in digit_string_range(10..=19)) {
        let minimum = *profile.breakpoints().last().unwrap();
        prop_assume!(digits.len() >= minimum);

        let once = profile.format(&digits).unwrap();
        let twice = profile.format(&strip_formatting(&once)).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(strip_formatting(&once), digits);
    }

    /// Property: The queue formatter and the regex formatter agree.
    #[test]
    fn format_strategies_agree(breakpoints in breakpoints(), digits in digit_string_range(0..=25)) {
        let profile = CardProfile::builder("Test", "test")
            .breakpoints(breakpoints)
            .security_code("CVV", 3)
            .lengths([[1, 25]])
            .id_ranges([1])
            .build()
            .unwrap();
        prop_assert_eq!(profile.format(&digits), format_with_pattern(&profile, &digits));
    }

    /// Property: Formatting adds one space per breakpoint.
    #[test]
    fn format_adds_one_space_per_breakpoint(profile in default_profile(), digits in digit_string_range(12..=19)) {
        let formatted = profile.format(&digits).unwrap();
        let spaces = formatted.chars().filter(|c| *c == ' ').count();
        let expected = profile.breakpoints().iter().filter(|&&b| b < digits.len()).count();
        prop_assert_eq!(spaces, expected);
    }

    /// Property: Formatting never panics on arbitrary input.
    #[test]
    fn format_never_panics(profile in default_profile(), input in ".*") {
        let _ = profile.format(&input);
        let _ = format_with_pattern(profile, &input);
    }
}

// =============================================================================
// RESOLUTION PROPERTIES
// =============================================================================

proptest! {
    /// Property: Resolution is deterministic and the same through every entry point.
    #[test]
    fn resolution_is_deterministic(digits in digit_string_range(0..=20)) {
        let first = resolve(&digits, catalog::default_profiles()).unwrap();
        let second = resolve(&digits, catalog::default_profiles()).unwrap();
        prop_assert_eq!(first, second);

        let resolver = Resolver::new();
        prop_assert_eq!(resolver.resolve(&digits).unwrap(), first);

        let mut batch = BatchResolver::new(&resolver);
        prop_assert_eq!(batch.resolve_all(&[digits.as_str()]).unwrap(), vec![first]);
    }

    /// Property: Separators do not change the resolved card type.
    #[test]
    fn separators_do_not_matter(formatted in luhn_number("4".to_string(), 16).prop_flat_map(with_separators)) {
        let resolved = resolve(&formatted, catalog::default_profiles()).unwrap();
        prop_assert_eq!(resolved.map(|p| p.alias()), Some("visa"));
    }

    /// Property: A resolved profile's ID ranges always match the number.
    #[test]
    fn resolved_profile_matches_number(digits in digit_string_range(12..=19)) {
        let lenient = Validator::without_checksum();
        let resolved = cc_cardtype::resolve_with(&digits, catalog::default_profiles(), &lenient).unwrap();
        if let Some(profile) = resolved {
            prop_assert!(profile.matches_id_range(&digits));
        }
    }

    /// Property: Shared Diners Club space always goes to Mastercard.
    #[test]
    fn diners_prefix_55_is_mastercard(number in luhn_number("55".to_string(), 16)) {
        let resolved = resolve(&number, catalog::default_profiles()).unwrap();
        prop_assert_eq!(resolved.map(|p| p.alias()), Some("mastercard"));
    }

    /// Property: Shared Discover space always goes to UnionPay.
    #[test]
    fn discover_cobrand_range_is_unionpay(
        number in (622126u32..=622925).prop_flat_map(|bin| luhn_number(bin.to_string(), 16))
    ) {
        let resolved = resolve(&number, catalog::default_profiles()).unwrap();
        prop_assert_eq!(resolved.map(|p| p.alias()), Some("unionpay"));
    }

    /// Property: Resolution never panics on arbitrary input.
    #[test]
    fn resolve_never_panics(input in ".*") {
        let _ = resolve(&input, catalog::default_profiles());
    }
}

// =============================================================================
// VALIDATION PROPERTIES
// =============================================================================

proptest! {
    /// Property: Appending the check digit always yields a Luhn-valid number.
    #[test]
    fn check_digit_completes_number(partial in digit_string_range(1..=18)) {
        let check = Luhn::check_digit(&partial);
        let completed = format!("{}{}", partial, check);
        prop_assert!(Luhn.verify(&completed));
    }

    /// Property: Changing any single digit breaks the Luhn check.
    #[test]
    fn single_digit_change_fails_luhn(number in luhn_number("4".to_string(), 16), position in 0usize..16, delta in 1u8..10) {
        let mut bytes = number.into_bytes();
        bytes[position] = b'0' + (bytes[position] - b'0' + delta) % 10;
        let changed = String::from_utf8(bytes).unwrap();
        prop_assert!(!Luhn.verify(&changed));
    }

    /// Property: A code is valid exactly when it has the profile's code length.
    #[test]
    fn code_validity_is_length_check(profile in default_profile(), code in digit_string_range(0..=6)) {
        prop_assert_eq!(
            profile.is_code_valid(&code),
            !code.is_empty() && code.len() == profile.security_code().length()
        );
    }

    /// Property: Normalizing keeps exactly the ASCII digits, in order.
    #[test]
    fn normalize_keeps_ascii_digits(input in ".*") {
        let digits = normalize(&input);
        let expected: String = input.chars().filter(char::is_ascii_digit).collect();
        prop_assert_eq!(digits.as_str(), expected.as_str());
    }
}
