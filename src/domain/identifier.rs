//! Session-scoped allocation of unique, syntactically valid identifiers.

use std::collections::HashSet;
use std::sync::OnceLock;

use rand::{seq::IndexedRandom, Rng};
use regex::Regex;
use tracing::trace;

use crate::domain::error::{DomainError, DomainResult};

/// Identifiers are never longer than this.
pub const MAX_IDENTIFIER_LENGTH: usize = 50;

/// Rejected samples tolerated before allocation gives up.
pub const MAX_IDENTIFIER_ATTEMPTS: usize = 10_000;

const LEADING: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
const TRAILING: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// `true` if `s` is a letter or underscore followed by word characters.
pub fn is_valid_identifier(s: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static identifier regex"))
        .is_match(s)
}

/// Hands out identifiers that are unique within one generation session.
#[derive(Debug, Default, Clone)]
pub struct IdentifierAllocator {
    used: HashSet<String>,
}

impl IdentifierAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample a fresh identifier with a length in `min..=max` (capped at 50).
    ///
    /// The identifier is recorded before it is returned.
    pub fn allocate<R: Rng + ?Sized>(
        &mut self,
        random: &mut R,
        min: usize,
        max: usize,
    ) -> DomainResult<String> {
        if max < min || max == 0 || min > MAX_IDENTIFIER_LENGTH {
            return Err(DomainError::InvalidLengthRange { min, max });
        }
        let min = min.max(1);
        let max = max.min(MAX_IDENTIFIER_LENGTH);

        for attempt in 0..MAX_IDENTIFIER_ATTEMPTS {
            let candidate = sample_identifier(random, min, max);
            if self.used.insert(candidate.clone()) {
                return Ok(candidate);
            }
            trace!("allocate: collision on {candidate} (attempt {attempt})");
        }

        Err(DomainError::IdentifierExhausted {
            attempts: MAX_IDENTIFIER_ATTEMPTS,
            min,
            max,
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Forget every identifier handed out so far.
    pub fn clear(&mut self) {
        self.used.clear();
    }
}

fn sample_identifier<R: Rng + ?Sized>(random: &mut R, min: usize, max: usize) -> String {
    let length = random.random_range(min..=max);
    let mut id = String::with_capacity(length);
    if let Some(&first) = LEADING.choose(random) {
        id.push(first as char);
    }
    for _ in 1..length {
        if let Some(&c) = TRAILING.choose(random) {
            id.push(c as char);
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1)]
    #[case(3, 10)]
    #[case(40, 80)]
    fn given_length_bounds_when_allocating_then_ids_are_valid_and_bounded(
        #[case] min: usize,
        #[case] max: usize,
    ) {
        let mut rng = StdRng::seed_from_u64(11);
        let mut ids = IdentifierAllocator::new();

        for _ in 0..30 {
            let id = ids.allocate(&mut rng, min, max).unwrap();
            assert!(is_valid_identifier(&id), "invalid identifier {id}");
            assert!(id.len() >= min && id.len() <= max.min(MAX_IDENTIFIER_LENGTH));
        }
        assert_eq!(ids.len(), 30);
    }

    #[test]
    fn given_inverted_range_when_allocating_then_errors() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ids = IdentifierAllocator::new();
        assert_eq!(
            ids.allocate(&mut rng, 5, 2),
            Err(DomainError::InvalidLengthRange { min: 5, max: 2 })
        );
    }

    #[test]
    fn given_exhausted_universe_when_allocating_then_errors() {
        // 53 possible one-character identifiers
        let mut rng = StdRng::seed_from_u64(3);
        let mut ids = IdentifierAllocator::new();
        for _ in 0..LEADING.len() {
            ids.allocate(&mut rng, 1, 1).unwrap();
        }

        let result = ids.allocate(&mut rng, 1, 1);

        assert!(matches!(result, Err(DomainError::IdentifierExhausted { .. })));
    }

    #[test]
    fn given_used_ids_when_clearing_then_set_is_empty() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ids = IdentifierAllocator::new();
        let id = ids.allocate(&mut rng, 4, 8).unwrap();
        assert!(ids.contains(&id));

        ids.clear();

        assert!(ids.is_empty());
        assert!(!ids.contains(&id));
    }

    #[test]
    fn given_identifier_strings_when_validating_then_matches_word_pattern() {
        assert!(is_valid_identifier("_a1"));
        assert!(is_valid_identifier("Yww"));
        assert!(!is_valid_identifier("1abc"));
        assert!(!is_valid_identifier("a-b"));
        assert!(!is_valid_identifier(""));
    }
}
