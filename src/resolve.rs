//! Card type identification.
//!
//! Resolution visits every candidate profile in order and keeps the one
//! whose ID range matched the number most specifically. A profile is only a
//! candidate if the number also satisfies its length constraints and, when
//! the profile asks for one, the checksum. On equal specificity the earlier
//! profile wins.
//!
//! Some issuers share BIN space with a partner, and the partner must win
//! even though the generic issuer's range matched as well. Those cases are
//! listed in a fixed table and applied after the best match is known:
//!
//! | matched profile | matched range starts with | resolves to |
//! |-----------------|---------------------------|-------------|
//! | `diners-club`   | `55`                      | `mastercard` |
//! | `troy`          | `65`                      | `discover`  |
//! | `discover`      | `622126` or `622925`      | `unionpay`  |
//!
//! The partner is looked up among the same candidates; if it is not one of
//! them the original match stands. The partner's own length and ID range
//! constraints are not re-checked, so the override can return a profile
//! that [`is_number_valid`](crate::is_number_valid) would reject for the
//! same number (a 14 digit `55...` Diners Club number resolves to
//! `mastercard`, whose lengths are 16 only).
//!
//! No checksum is consulted unless the [`Validator`] carries one; see
//! [`Resolver::with_validator`].
//!
//! # Example
//!
//! ```
//! use cc_cardtype::Resolver;
//!
//! let resolver = Resolver::new();
//! let profile = resolver.resolve("3782 822463 10005").unwrap().unwrap();
//! assert_eq!(profile.alias(), "american-express");
//!
//! // Shared Diners Club / Mastercard space goes to Mastercard.
//! let profile = resolver.resolve("5500 0000 0000 0004").unwrap().unwrap();
//! assert_eq!(profile.alias(), "mastercard");
//!
//! // Unknown numbers are not an error.
//! assert!(resolver.resolve("0000000000000000").unwrap().is_none());
//! ```

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::catalog::default_profiles;
use crate::error::ResolveError;
use crate::input::CardInput;
use crate::matcher::{matched_id_range, matches_length, normalize_input, RangeMatch};
use crate::profile::CardProfile;
use crate::validate::Validator;

/// A co-branded BIN allocation where the partner takes precedence.
struct Partnership {
    matched: &'static str,
    prefix: &'static str,
    partner: &'static str,
}

const PARTNERSHIPS: &[Partnership] = &[
    Partnership {
        matched: "diners-club",
        prefix: "55",
        partner: "mastercard",
    },
    Partnership {
        matched: "troy",
        prefix: "65",
        partner: "discover",
    },
    Partnership {
        matched: "discover",
        prefix: "622126",
        partner: "unionpay",
    },
    Partnership {
        matched: "discover",
        prefix: "622925",
        partner: "unionpay",
    },
];

/// Whether a visited profile accepted the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Length, checksum and ID range all matched.
    Valid,
    /// At least one check failed.
    Invalid,
}

/// Profiles examined during resolution, keyed by alias.
///
/// Outcomes accumulate across calls until [`clear`](Self::clear) is called;
/// a profile visited again keeps its most recent outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    visited: HashMap<String, Outcome>,
}

impl Coverage {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome for `alias`.
    pub fn record(&mut self, alias: &str, outcome: Outcome) {
        match self.visited.get_mut(alias) {
            Some(existing) => *existing = outcome,
            None => {
                self.visited.insert(alias.to_string(), outcome);
            }
        }
    }

    /// Returns the last recorded outcome for `alias`.
    pub fn get(&self, alias: &str) -> Option<Outcome> {
        self.visited.get(alias).copied()
    }

    /// Iterates over `(alias, outcome)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Outcome)> {
        self.visited.iter().map(|(alias, outcome)| (alias.as_str(), *outcome))
    }

    /// Number of distinct profiles visited.
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Number of profiles whose last outcome was [`Outcome::Valid`].
    pub fn valid_count(&self) -> usize {
        self.visited.values().filter(|o| **o == Outcome::Valid).count()
    }

    /// Folds another map into this one; `other` wins on conflicts.
    pub fn merge(&mut self, other: Coverage) {
        self.visited.extend(other.visited);
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.visited.clear();
    }
}

/// Resolves card numbers against the built-in profiles and/or registered ones.
///
/// With defaults enabled (the default) the built-in catalogue is searched
/// first, followed by registered profiles in registration order. In
/// registered-only mode just the registered profiles are searched, and
/// resolving with none registered is an error.
///
/// # Example
///
/// ```
/// use cc_cardtype::{CardProfile, Resolver, DEBIT_CARD};
///
/// let napas = CardProfile::builder("Napas", "napas")
///     .kind(DEBIT_CARD)
///     .breakpoints([4, 8, 12])
///     .security_code("CVC", 3)
///     .lengths([16, 19])
///     .id_ranges([9704])
///     .build()
///     .unwrap();
///
/// let resolver = Resolver::registered_only().with_profiles([napas]).unwrap();
/// let profile = resolver.resolve("9704 0000 0000 0000 016").unwrap().unwrap();
/// assert_eq!(profile.name(), "Napas");
/// ```
#[derive(Debug, Clone)]
pub struct Resolver {
    registered: Vec<CardProfile>,
    include_defaults: bool,
    validator: Validator,
}

impl Resolver {
    /// Creates a resolver over the built-in catalogue.
    pub fn new() -> Self {
        Self {
            registered: Vec::new(),
            include_defaults: true,
            validator: Validator::default(),
        }
    }

    /// Creates a resolver that only searches registered profiles.
    pub fn registered_only() -> Self {
        Self {
            include_defaults: false,
            ..Self::new()
        }
    }

    /// Replaces the validator used for checksum gating.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Registers `profiles` in order.
    pub fn with_profiles<I>(mut self, profiles: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = CardProfile>,
    {
        for profile in profiles {
            self.register(profile)?;
        }
        Ok(self)
    }

    /// Registers one profile after those already registered.
    ///
    /// # Errors
    ///
    /// [`ResolveError::DuplicateAlias`] if a candidate with the same alias
    /// already exists, built-in profiles included when they are searched.
    pub fn register(&mut self, profile: CardProfile) -> Result<(), ResolveError> {
        if self.find(profile.alias()).is_some() {
            return Err(ResolveError::DuplicateAlias {
                alias: profile.alias().to_string(),
            });
        }
        self.registered.push(profile);
        Ok(())
    }

    /// Returns the registered profiles.
    pub fn registered(&self) -> &[CardProfile] {
        &self.registered
    }

    /// Returns true if the built-in catalogue is searched.
    pub fn includes_defaults(&self) -> bool {
        self.include_defaults
    }

    /// Returns the validator used for checksum gating.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Returns every profile searched, in search order.
    pub fn candidates(&self) -> Vec<&CardProfile> {
        let defaults: &[CardProfile] = if self.include_defaults {
            default_profiles()
        } else {
            &[]
        };
        defaults.iter().chain(self.registered.iter()).collect()
    }

    /// Looks up a candidate by alias.
    pub fn find(&self, alias: &str) -> Option<&CardProfile> {
        self.candidates().into_iter().find(|p| p.alias() == alias)
    }

    /// Identifies the card type of `number`.
    ///
    /// Returns `Ok(None)` when no profile matches, including when `number`
    /// has no digits at all.
    ///
    /// # Errors
    ///
    /// [`ResolveError::NoProfiles`] if there is nothing to search.
    pub fn resolve<N: CardInput + ?Sized>(
        &self,
        number: &N,
    ) -> Result<Option<&CardProfile>, ResolveError> {
        let candidates = self.candidates();
        resolve_candidates(number, &candidates, &self.validator, None)
    }

    /// Like [`resolve`](Self::resolve), recording every visited profile in `coverage`.
    pub fn resolve_recording<N: CardInput + ?Sized>(
        &self,
        number: &N,
        coverage: &mut Coverage,
    ) -> Result<Option<&CardProfile>, ResolveError> {
        let candidates = self.candidates();
        resolve_candidates(number, &candidates, &self.validator, Some(coverage))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies the card type of `number` among `profiles`, in order.
///
/// Uses [`Validator::default`], which consults no checksum.
///
/// ```
/// use cc_cardtype::{catalog, resolve};
///
/// let visa = resolve("4111111111111111", catalog::default_profiles()).unwrap();
/// assert_eq!(visa.map(|p| p.name()), Some("Visa"));
/// ```
///
/// # Errors
///
/// [`ResolveError::NoProfiles`] if `profiles` is empty, and
/// [`ResolveError::DuplicateAlias`] if two profiles share an alias.
pub fn resolve<'p, N: CardInput + ?Sized>(
    number: &N,
    profiles: &'p [CardProfile],
) -> Result<Option<&'p CardProfile>, ResolveError> {
    resolve_with(number, profiles, &Validator::default())
}

/// Like [`resolve`] with an explicit validator.
pub fn resolve_with<'p, N: CardInput + ?Sized>(
    number: &N,
    profiles: &'p [CardProfile],
    validator: &Validator,
) -> Result<Option<&'p CardProfile>, ResolveError> {
    let mut seen = HashSet::with_capacity(profiles.len());
    for profile in profiles {
        if !seen.insert(profile.alias()) {
            return Err(ResolveError::DuplicateAlias {
                alias: profile.alias().to_string(),
            });
        }
    }
    let candidates: Vec<&CardProfile> = profiles.iter().collect();
    resolve_candidates(number, &candidates, validator, None)
}

pub(crate) fn resolve_candidates<'p, N: CardInput + ?Sized>(
    number: &N,
    candidates: &[&'p CardProfile],
    validator: &Validator,
    mut coverage: Option<&mut Coverage>,
) -> Result<Option<&'p CardProfile>, ResolveError> {
    if candidates.is_empty() {
        return Err(ResolveError::NoProfiles);
    }

    let digits = normalize_input(number);
    if digits.is_empty() {
        return Ok(None);
    }

    let mut best: Option<(&'p CardProfile, RangeMatch)> = None;
    for &profile in candidates {
        let matched = if matches_length(profile.lengths(), &digits)
            && validator.passes_checksum(profile, &digits)
        {
            matched_id_range(profile.id_ranges(), &digits)
        } else {
            None
        };

        let outcome = if matched.is_some() {
            Outcome::Valid
        } else {
            Outcome::Invalid
        };
        trace!(
            alias = profile.alias(),
            ?outcome,
            specificity = matched.map(|m| m.specificity),
            "visited card profile"
        );
        if let Some(coverage) = coverage.as_deref_mut() {
            coverage.record(profile.alias(), outcome);
        }

        if let Some(matched) = matched {
            if best.map_or(true, |(_, current)| matched.specificity > current.specificity) {
                best = Some((profile, matched));
            }
        }
    }

    Ok(best.map(|(profile, matched)| apply_partnership(profile, matched, candidates)))
}

fn apply_partnership<'p>(
    profile: &'p CardProfile,
    matched: RangeMatch,
    candidates: &[&'p CardProfile],
) -> &'p CardProfile {
    let partnership = PARTNERSHIPS
        .iter()
        .find(|p| p.matched == profile.alias() && matched.range.starts_with(p.prefix));
    let Some(partnership) = partnership else {
        return profile;
    };

    match candidates.iter().copied().find(|c| c.alias() == partnership.partner) {
        Some(partner) => {
            debug!(
                matched = profile.alias(),
                partner = partner.alias(),
                range = %matched.range,
                "partnered card override applied"
            );
            partner
        }
        None => profile,
    }
}
