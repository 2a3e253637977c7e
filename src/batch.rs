//! Batch card type resolution.
//!
//! A [`BatchResolver`] resolves many numbers against one candidate set and
//! keeps a [`Coverage`] map of every profile it examined, accumulated over
//! all batches until cleared.
//!
//! # Performance
//!
//! - The candidate list is built once per batch resolver, not per number
//! - Optional parallel processing with the `parallel` feature

use tracing::debug;

use crate::error::ResolveError;
use crate::input::CardInput;
use crate::profile::CardProfile;
use crate::resolve::{resolve_candidates, Coverage, Resolver};
use crate::validate::Validator;

/// Resolves batches of card numbers and records which profiles were examined.
///
/// # Example
///
/// ```
/// use cc_cardtype::{BatchResolver, Outcome, Resolver};
///
/// let resolver = Resolver::new();
/// let mut batch = BatchResolver::new(&resolver);
/// let cards = ["4111111111111111", "5555555555554444", "1234567890123456"];
/// let results = batch.resolve_all(&cards).unwrap();
///
/// assert_eq!(results[0].map(|p| p.alias()), Some("visa"));
/// assert_eq!(results[1].map(|p| p.alias()), Some("mastercard"));
/// assert!(results[2].is_none());
/// assert_eq!(batch.coverage().get("visa"), Some(Outcome::Invalid));
/// ```
#[derive(Debug, Clone)]
pub struct BatchResolver<'r> {
    candidates: Vec<&'r CardProfile>,
    validator: &'r Validator,
    coverage: Coverage,
}

impl<'r> BatchResolver<'r> {
    /// Creates a batch resolver over `resolver`'s candidates.
    pub fn new(resolver: &'r Resolver) -> Self {
        Self {
            candidates: resolver.candidates(),
            validator: resolver.validator(),
            coverage: Coverage::new(),
        }
    }

    /// Resolves every number, in order.
    ///
    /// # Errors
    ///
    /// [`ResolveError::NoProfiles`] if there are no candidates; nothing is
    /// resolved in that case.
    pub fn resolve_all<S: CardInput>(
        &mut self,
        cards: &[S],
    ) -> Result<Vec<Option<&'r CardProfile>>, ResolveError> {
        self.ensure_candidates()?;
        let results = cards
            .iter()
            .map(|card| {
                resolve_candidates(card, &self.candidates, self.validator, Some(&mut self.coverage))
            })
            .collect::<Result<Vec<_>, _>>()?;
        log_summary(&results);
        Ok(results)
    }

    /// Resolves every number and keeps only the matches, with their input index.
    pub fn resolve_matched_only<S: CardInput>(
        &mut self,
        cards: &[S],
    ) -> Result<Vec<(usize, &'r CardProfile)>, ResolveError> {
        Ok(self
            .resolve_all(cards)?
            .into_iter()
            .enumerate()
            .filter_map(|(index, profile)| profile.map(|p| (index, p)))
            .collect())
    }

    /// Counts resolved and unresolved numbers.
    ///
    /// Returns `(resolved, unresolved)`.
    pub fn count_resolved<S: CardInput>(&mut self, cards: &[S]) -> Result<(usize, usize), ResolveError> {
        let resolved = self.resolve_all(cards)?.iter().filter(|p| p.is_some()).count();
        Ok((resolved, cards.len() - resolved))
    }

    /// Resolves numbers in parallel using rayon.
    ///
    /// Results and the accumulated coverage are the same as with
    /// [`resolve_all`](Self::resolve_all).
    ///
    /// # Feature
    ///
    /// Requires the `parallel` feature to be enabled.
    #[cfg(feature = "parallel")]
    pub fn resolve_parallel<S: CardInput + Sync>(
        &mut self,
        cards: &[S],
    ) -> Result<Vec<Option<&'r CardProfile>>, ResolveError> {
        use rayon::prelude::*;

        self.ensure_candidates()?;
        let candidates = &self.candidates;
        let validator = self.validator;
        let outcomes: Vec<_> = cards
            .par_iter()
            .map(|card| {
                let mut coverage = Coverage::new();
                let resolved = resolve_candidates(card, candidates, validator, Some(&mut coverage));
                resolved.map(|profile| (profile, coverage))
            })
            .collect::<Result<_, _>>()?;

        let mut results = Vec::with_capacity(outcomes.len());
        for (profile, coverage) in outcomes {
            self.coverage.merge(coverage);
            results.push(profile);
        }
        log_summary(&results);
        Ok(results)
    }

    /// Returns the profiles examined so far.
    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    /// Forgets the profiles examined so far.
    pub fn clear_coverage(&mut self) {
        self.coverage.clear();
    }

    /// Returns the coverage map and starts a fresh one.
    pub fn take_coverage(&mut self) -> Coverage {
        std::mem::take(&mut self.coverage)
    }

    fn ensure_candidates(&self) -> Result<(), ResolveError> {
        if self.candidates.is_empty() {
            Err(ResolveError::NoProfiles)
        } else {
            Ok(())
        }
    }
}

fn log_summary(results: &[Option<&CardProfile>]) {
    debug!(
        cards = results.len(),
        resolved = results.iter().filter(|p| p.is_some()).count(),
        "batch resolution complete"
    );
}

/// Resolves a slice of numbers against the built-in catalogue.
///
/// # Example
///
/// ```
/// use cc_cardtype::batch::resolve_batch;
///
/// let results = resolve_batch(&["4111111111111111", "378282246310005"]);
/// assert_eq!(results[0].map(|p| p.name()), Some("Visa"));
/// assert_eq!(results[1].map(|p| p.name()), Some("American Express"));
/// ```
pub fn resolve_batch<S: CardInput>(cards: &[S]) -> Vec<Option<&'static CardProfile>> {
    let candidates: Vec<&'static CardProfile> = crate::catalog::default_profiles().iter().collect();
    let validator = Validator::default();
    cards
        .iter()
        .map(|card| {
            resolve_candidates(card, &candidates, &validator, None)
                .ok()
                .flatten()
        })
        .collect()
}

/// Resolves a slice of numbers against the built-in catalogue in parallel.
///
/// # Feature
///
/// Requires the `parallel` feature to be enabled.
#[cfg(feature = "parallel")]
pub fn resolve_batch_parallel<S: CardInput + Sync>(cards: &[S]) -> Vec<Option<&'static CardProfile>> {
    use rayon::prelude::*;

    let candidates: Vec<&'static CardProfile> = crate::catalog::default_profiles().iter().collect();
    let validator = Validator::default();
    cards
        .par_iter()
        .map(|card| {
            resolve_candidates(card, &candidates, &validator, None)
                .ok()
                .flatten()
        })
        .collect()
}
