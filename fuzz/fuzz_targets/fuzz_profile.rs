//! Fuzz target for card profile construction.
//!
//! Tests that building profiles from arbitrary schema values never panics,
//! and that whatever builds can be used for resolution and formatting.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use cc_cardtype::source::JsonSource;
use cc_cardtype::{resolve, CardProfile, RawSize, SizeValue};

#[derive(Debug, Arbitrary)]
enum Size {
    Int(i64),
    Text(String),
    Pair(i64, i64),
    Many(Vec<i64>),
}

impl From<Size> for RawSize {
    fn from(size: Size) -> Self {
        match size {
            Size::Int(value) => RawSize::from(value),
            Size::Text(value) => RawSize::from(value),
            Size::Pair(min, max) => RawSize::from([min, max]),
            Size::Many(values) => RawSize::from(values.into_iter().map(SizeValue::from).collect::<Vec<_>>()),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    breakpoints: Vec<i64>,
    code_length: i64,
    lengths: Vec<Size>,
    id_ranges: Vec<Size>,
    number: String,
    json: String,
}

fuzz_target!(|input: Input| {
    let built = CardProfile::builder("Fuzz", "fuzz")
        .breakpoints(input.breakpoints)
        .security_code("CVV", input.code_length)
        .lengths(input.lengths)
        .id_ranges(input.id_ranges)
        .build();

    if let Ok(profile) = built {
        let profiles = [profile];
        let _ = resolve(input.number.as_str(), &profiles);
        let _ = profiles[0].format(input.number.as_str());
        let _ = profiles[0].is_code_valid(input.number.as_str());
    }

    // The JSON loader rejects what it cannot build, without panicking
    let _ = JsonSource::parse(&input.json);
});
