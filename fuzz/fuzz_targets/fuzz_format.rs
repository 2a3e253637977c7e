//! Fuzz target for card formatting.
//!
//! Tests that formatting functions never panic on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use cc_cardtype::catalog;
use cc_cardtype::format::{
    format_with_pattern, format_with_separator, split_into_groups, strip_formatting,
};

fuzz_target!(|data: &str| {
    let original_digits = strip_formatting(data);

    for profile in catalog::default_profiles() {
        // These should never panic
        let queued = profile.format(data);
        let _ = format_with_separator(profile, data, "-");
        let _ = format_with_separator(profile, data, "");
        let _ = split_into_groups(profile, data);

        // Both strategies agree on card-sized input
        let pattern = format_with_pattern(profile, data);
        if original_digits.len() <= 32 {
            assert_eq!(queued, pattern, "format strategies disagree");
        }

        // Verify roundtrip property
        if let Ok(formatted) = queued {
            assert_eq!(
                strip_formatting(&formatted),
                original_digits,
                "Format roundtrip should preserve digits"
            );
        }
    }
});
