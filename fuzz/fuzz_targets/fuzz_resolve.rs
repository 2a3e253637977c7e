//! Fuzz target for card type resolution.
//!
//! Tests that resolution and validation never panic on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use cc_cardtype::{catalog, is_code_valid, is_number_valid, resolve, Luhn, Resolver, Validator};

fuzz_target!(|data: &str| {
    // These should never panic, regardless of input
    let resolved = resolve(data, catalog::default_profiles());
    let strict = Resolver::new().with_validator(Validator::with_checksum(Luhn));
    let _ = strict.resolve(data);

    for profile in catalog::default_profiles() {
        let _ = is_number_valid(profile, data);
        let _ = is_code_valid(profile, data);
        // Raw, unnormalized text straight into the range matcher.
        let _ = profile.matches_id_range(data);
    }

    // A resolved profile always claims the number's leading digits.
    if let Ok(Some(profile)) = resolved {
        let digits: String = data.chars().filter(|c| c.is_ascii_digit()).collect();
        assert!(profile.matches_id_range(&digits), "resolved profile should match its number");
    }
});
