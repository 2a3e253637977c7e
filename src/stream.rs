//! Streaming resolution for processing card numbers as they arrive.
//!
//! Iterator adapters that resolve each number lazily against a
//! [`Resolver`], useful for large files or network streams that should not
//! be loaded into memory at once.
//!
//! # Example
//!
//! ```
//! use cc_cardtype::stream::ResolveExt;
//! use cc_cardtype::Resolver;
//!
//! let resolver = Resolver::new();
//! let cards = vec!["4111111111111111", "5500000000000004", "invalid"];
//! let resolved = cards
//!     .iter()
//!     .copied()
//!     .resolve_cards(&resolver)
//!     .filter(|r| matches!(r, Ok(Some(_))))
//!     .count();
//!
//! assert_eq!(resolved, 2);
//! ```

use crate::error::ResolveError;
use crate::input::CardInput;
use crate::profile::CardProfile;
use crate::resolve::{resolve_candidates, Resolver};
use crate::validate::Validator;

#[derive(Debug, Clone)]
struct Candidates<'r> {
    profiles: Vec<&'r CardProfile>,
    validator: &'r Validator,
}

impl<'r> Candidates<'r> {
    fn new(resolver: &'r Resolver) -> Self {
        Self {
            profiles: resolver.candidates(),
            validator: resolver.validator(),
        }
    }

    #[inline]
    fn resolve<N: CardInput + ?Sized>(
        &self,
        number: &N,
    ) -> Result<Option<&'r CardProfile>, ResolveError> {
        resolve_candidates(number, &self.profiles, self.validator, None)
    }
}

/// Resolves each number yielded by the wrapped iterator.
///
/// Created by [`ResolveExt::resolve_cards`].
#[derive(Debug, Clone)]
pub struct ResolveStream<'r, I> {
    inner: I,
    candidates: Candidates<'r>,
}

impl<'r, I> ResolveStream<'r, I> {
    /// Creates a stream resolving `inner` against `resolver`.
    #[inline]
    pub fn new(inner: I, resolver: &'r Resolver) -> Self {
        Self {
            inner,
            candidates: Candidates::new(resolver),
        }
    }

    /// Consumes the stream and returns the inner iterator.
    #[inline]
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<'r, I, S> Iterator for ResolveStream<'r, I>
where
    I: Iterator<Item = S>,
    S: CardInput,
{
    type Item = Result<Option<&'r CardProfile>, ResolveError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let number = self.inner.next()?;
        Some(self.candidates.resolve(&number))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'r, I, S> ExactSizeIterator for ResolveStream<'r, I>
where
    I: ExactSizeIterator<Item = S>,
    S: CardInput,
{
}

impl<'r, I, S> DoubleEndedIterator for ResolveStream<'r, I>
where
    I: DoubleEndedIterator<Item = S>,
    S: CardInput,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let number = self.inner.next_back()?;
        Some(self.candidates.resolve(&number))
    }
}

/// Yields only the profiles of numbers that resolved.
///
/// Unresolved numbers are skipped, and so is everything when there are no
/// candidate profiles.
#[derive(Debug, Clone)]
pub struct MatchedStream<'r, I> {
    inner: I,
    candidates: Candidates<'r>,
}

impl<'r, I, S> Iterator for MatchedStream<'r, I>
where
    I: Iterator<Item = S>,
    S: CardInput,
{
    type Item = &'r CardProfile;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for number in self.inner.by_ref() {
            if let Ok(Some(profile)) = self.candidates.resolve(&number) {
                return Some(profile);
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.inner.size_hint();
        (0, upper)
    }
}

/// Resolves each number and pairs the result with its position.
#[derive(Debug, Clone)]
pub struct IndexedResolveStream<'r, I> {
    inner: I,
    candidates: Candidates<'r>,
    index: usize,
}

impl<'r, I, S> Iterator for IndexedResolveStream<'r, I>
where
    I: Iterator<Item = S>,
    S: CardInput,
{
    type Item = (usize, Result<Option<&'r CardProfile>, ResolveError>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let number = self.inner.next()?;
        let index = self.index;
        self.index += 1;
        Some((index, self.candidates.resolve(&number)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Extension trait adding card type resolution to any iterator.
pub trait ResolveExt: Iterator + Sized {
    /// Resolves each number yielded by the iterator.
    fn resolve_cards(self, resolver: &Resolver) -> ResolveStream<'_, Self>;

    /// Resolves and yields only the matching profiles.
    ///
    /// ```
    /// use cc_cardtype::stream::ResolveExt;
    /// use cc_cardtype::Resolver;
    ///
    /// let resolver = Resolver::new();
    /// let cards = ["4111111111111111", "invalid", "378282246310005"];
    /// let names: Vec<_> = cards
    ///     .iter()
    ///     .copied()
    ///     .resolve_matched(&resolver)
    ///     .map(|p| p.name())
    ///     .collect();
    /// assert_eq!(names, ["Visa", "American Express"]);
    /// ```
    fn resolve_matched(self, resolver: &Resolver) -> MatchedStream<'_, Self>;

    /// Resolves with index tracking.
    fn resolve_indexed(self, resolver: &Resolver) -> IndexedResolveStream<'_, Self>;
}

impl<I: Iterator + Sized> ResolveExt for I {
    #[inline]
    fn resolve_cards(self, resolver: &Resolver) -> ResolveStream<'_, Self> {
        ResolveStream::new(self, resolver)
    }

    #[inline]
    fn resolve_matched(self, resolver: &Resolver) -> MatchedStream<'_, Self> {
        MatchedStream {
            inner: self,
            candidates: Candidates::new(resolver),
        }
    }

    #[inline]
    fn resolve_indexed(self, resolver: &Resolver) -> IndexedResolveStream<'_, Self> {
        IndexedResolveStream {
            inner: self,
            candidates: Candidates::new(resolver),
            index: 0,
        }
    }
}

/// Creates a resolution stream over a slice of numbers.
#[inline]
pub fn resolve_stream<'a, S: CardInput + 'a>(
    cards: &'a [S],
    resolver: &'a Resolver,
) -> ResolveStream<'a, std::slice::Iter<'a, S>> {
    ResolveStream::new(cards.iter(), resolver)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VISA: &str = "4111111111111111";
    const MASTERCARD: &str = "5500000000000004";
    const UNKNOWN: &str = "1234567890123456";

    fn alias<'a>(result: &Result<Option<&'a CardProfile>, ResolveError>) -> Option<&'a str> {
        result.as_ref().ok().and_then(|p| p.map(|p| p.alias()))
    }

    #[test]
    fn test_resolve_stream() {
        let resolver = Resolver::new();
        let results: Vec<_> = [VISA, MASTERCARD, UNKNOWN]
            .iter()
            .copied()
            .resolve_cards(&resolver)
            .collect();

        assert_eq!(results.len(), 3);
        assert_eq!(alias(&results[0]), Some("visa"));
        assert_eq!(alias(&results[1]), Some("mastercard"));
        assert_eq!(results[2], Ok(None));
    }

    #[test]
    fn test_matched_stream() {
        let resolver = Resolver::new();
        let matched: Vec<_> = [VISA, UNKNOWN, MASTERCARD, "bad"]
            .iter()
            .copied()
            .resolve_matched(&resolver)
            .map(|p| p.alias())
            .collect();
        assert_eq!(matched, ["visa", "mastercard"]);
    }

    #[test]
    fn test_indexed_stream() {
        let resolver = Resolver::new();
        let results: Vec<_> = [VISA, UNKNOWN, MASTERCARD]
            .iter()
            .copied()
            .resolve_indexed(&resolver)
            .collect();

        assert_eq!(results[0].0, 0);
        assert_eq!(alias(&results[0].1), Some("visa"));
        assert_eq!(results[1].0, 1);
        assert_eq!(results[1].1, Ok(None));
        assert_eq!(results[2].0, 2);
    }

    #[test]
    fn test_stream_without_profiles() {
        let resolver = Resolver::registered_only();
        let results: Vec<_> = [VISA].iter().copied().resolve_cards(&resolver).collect();
        assert_eq!(results, vec![Err(ResolveError::NoProfiles)]);

        let matched = [VISA].iter().copied().resolve_matched(&resolver).count();
        assert_eq!(matched, 0);
    }

    #[test]
    fn test_size_hints() {
        let resolver = Resolver::new();
        let cards = [VISA, MASTERCARD, UNKNOWN];
        assert_eq!(cards.iter().copied().resolve_cards(&resolver).size_hint(), (3, Some(3)));
        assert_eq!(cards.iter().copied().resolve_matched(&resolver).size_hint(), (0, Some(3)));
    }

    #[test]
    fn test_double_ended() {
        let resolver = Resolver::new();
        let cards = [VISA, MASTERCARD];
        let mut stream = cards.iter().copied().resolve_cards(&resolver);
        assert_eq!(alias(&stream.next_back().unwrap()), Some("mastercard"));
        assert_eq!(alias(&stream.next().unwrap()), Some("visa"));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_with_integers_and_strings() {
        let resolver = Resolver::new();
        let numbers = [4111111111111111u64, 378282246310005u64];
        let count = numbers.iter().resolve_matched(&resolver).count();
        assert_eq!(count, 2);

        let owned: Vec<String> = vec![VISA.to_string()];
        let count = resolve_stream(&owned, &resolver).filter(|r| matches!(r, Ok(Some(_)))).count();
        assert_eq!(count, 1);
    }
}
