//! Built-in card profiles.
//!
//! The table order matters: when two profiles match a number with the same
//! specificity, the one listed first wins.

use std::sync::OnceLock;

use crate::profile::{CardProfile, IdRange, LengthConstraint, CREDIT_CARD};

use crate::profile::IdRange::{Exact as Prefix, Range as Between};
use crate::profile::LengthConstraint::{Exact as Len, Range as LenRange};

/// One row of the built-in table.
struct Entry {
    name: &'static str,
    alias: &'static str,
    breakpoints: &'static [usize],
    code: (&'static str, usize),
    lengths: &'static [LengthConstraint],
    id_ranges: &'static [IdRange],
}

const STANDARD_BREAKPOINTS: &[usize] = &[4, 8, 12];

const ENTRIES: &[Entry] = &[
    Entry {
        name: "American Express",
        alias: "american-express",
        breakpoints: &[4, 10],
        code: ("CID", 4),
        lengths: &[Len(15)],
        id_ranges: &[Prefix(34), Prefix(37)],
    },
    Entry {
        name: "Diners Club",
        alias: "diners-club",
        breakpoints: &[4, 10],
        code: ("CVV", 3),
        lengths: &[Len(16), LenRange { min: 14, max: 19 }],
        id_ranges: &[Prefix(55), Prefix(30), Prefix(36), Prefix(38), Prefix(39)],
    },
    Entry {
        name: "Mastercard",
        alias: "mastercard",
        breakpoints: STANDARD_BREAKPOINTS,
        code: ("CVC", 3),
        lengths: &[Len(16)],
        id_ranges: &[
            Between { min: 51, max: 55 },
            Between { min: 2221, max: 2720 },
        ],
    },
    Entry {
        name: "Discover",
        alias: "discover",
        breakpoints: STANDARD_BREAKPOINTS,
        code: ("CID", 3),
        lengths: &[LenRange { min: 16, max: 19 }],
        id_ranges: &[
            Between { min: 622126, max: 622925 },
            Prefix(6011),
            Between { min: 644, max: 649 },
            Prefix(65),
        ],
    },
    Entry {
        name: "UnionPay",
        alias: "unionpay",
        breakpoints: STANDARD_BREAKPOINTS,
        code: ("CVN", 3),
        lengths: &[LenRange { min: 16, max: 19 }],
        id_ranges: &[Prefix(62)],
    },
    Entry {
        name: "Maestro",
        alias: "maestro",
        breakpoints: STANDARD_BREAKPOINTS,
        code: ("CVC", 3),
        lengths: &[LenRange { min: 12, max: 19 }],
        id_ranges: &[
            Prefix(6759),
            Prefix(676770),
            Prefix(676774),
            Prefix(5018),
            Prefix(5020),
            Prefix(5038),
            Prefix(5893),
            Prefix(6304),
            Prefix(6761),
            Prefix(6762),
            Prefix(6763),
        ],
    },
    Entry {
        name: "Visa",
        alias: "visa",
        breakpoints: STANDARD_BREAKPOINTS,
        code: ("CVV", 3),
        lengths: &[Len(13), Len(16), Len(19)],
        id_ranges: &[Prefix(4)],
    },
    Entry {
        name: "Troy",
        alias: "troy",
        breakpoints: STANDARD_BREAKPOINTS,
        code: ("CVV", 3),
        lengths: &[Len(16)],
        id_ranges: &[Prefix(65), Prefix(9792)],
    },
    Entry {
        name: "JCB",
        alias: "jcb",
        breakpoints: STANDARD_BREAKPOINTS,
        code: ("CVV", 3),
        lengths: &[LenRange { min: 16, max: 19 }],
        id_ranges: &[Between { min: 3528, max: 3589 }],
    },
    Entry {
        name: "Mir",
        alias: "mir",
        breakpoints: STANDARD_BREAKPOINTS,
        code: ("CVP2", 3),
        lengths: &[LenRange { min: 16, max: 19 }],
        id_ranges: &[Between { min: 2200, max: 2204 }],
    },
];

static DEFAULT_PROFILES: OnceLock<Vec<CardProfile>> = OnceLock::new();

/// Returns the built-in profiles, in resolution order.
///
/// # Example
///
/// ```
/// use cc_cardtype::catalog::default_profiles;
///
/// let aliases: Vec<_> = default_profiles().iter().map(|p| p.alias()).collect();
/// assert_eq!(aliases[0], "american-express");
/// assert!(aliases.contains(&"mir"));
/// ```
pub fn default_profiles() -> &'static [CardProfile] {
    DEFAULT_PROFILES.get_or_init(|| {
        ENTRIES
            .iter()
            .map(|entry| {
                CardProfile::from_parts(
                    CREDIT_CARD,
                    entry.name,
                    entry.alias,
                    entry.breakpoints,
                    entry.code,
                    entry.lengths,
                    entry.id_ranges,
                    true,
                )
            })
            .collect()
    })
}

/// Looks up a built-in profile by alias.
pub fn find(alias: &str) -> Option<&'static CardProfile> {
    default_profiles().iter().find(|profile| profile.alias() == alias)
}
