#![allow(dead_code)]
//! Game logic: round content, word validation, arithmetic, scoring

pub mod arithmetic;
pub mod dictionary;
pub mod scoring;
pub mod validation;

use once_cell::sync::Lazy;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spanish vowel frequencies (percentages * 100 for integer weights).
const VOWEL_WEIGHTS: [(char, u32); 5] = [
    ('A', 1253),
    ('E', 1368),
    ('I', 625),
    ('O', 868),
    ('U', 393),
];

/// Spanish consonant frequencies (percentages * 100 for integer weights).
const CONSONANT_WEIGHTS: [(char, u32); 21] = [
    ('B', 142),
    ('C', 468),
    ('D', 586),
    ('F', 69),
    ('G', 101),
    ('H', 70),
    ('J', 44),
    ('K', 2),
    ('L', 497),
    ('M', 315),
    ('N', 671),
    ('P', 251),
    ('Q', 88),
    ('R', 687),
    ('S', 798),
    ('T', 463),
    ('V', 90),
    ('W', 2),
    ('X', 22),
    ('Y', 90),
    ('Z', 52),
];

pub const DEFAULT_VOWELS: usize = 5;
pub const DEFAULT_CONSONANTS: usize = 4;

const LARGE_NUMBERS: [i64; 4] = [25, 50, 75, 100];
const SMALL_NUMBERS: [i64; 20] = [1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10];
pub const LARGE_COUNT: usize = 2;
pub const SMALL_COUNT: usize = 4;
pub const MIN_TARGET: i64 = 100;
pub const MAX_TARGET: i64 = 999;

static VOWEL_DIST: Lazy<WeightedIndex<u32>> = Lazy::new(|| {
    WeightedIndex::new(VOWEL_WEIGHTS.iter().map(|(_, w)| *w)).expect("valid vowel weights")
});

static CONSONANT_DIST: Lazy<WeightedIndex<u32>> = Lazy::new(|| {
    WeightedIndex::new(CONSONANT_WEIGHTS.iter().map(|(_, w)| *w)).expect("valid consonant weights")
});

/// Kind of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    Letters,
    Numbers,
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundType::Letters => write!(f, "letters"),
            RoundType::Numbers => write!(f, "numbers"),
        }
    }
}

/// Check whether a letter belongs to the vowel table.
pub fn is_vowel(c: char) -> bool {
    VOWEL_WEIGHTS.iter().any(|(v, _)| *v == c)
}

/// Check whether a letter belongs to the consonant table.
pub fn is_consonant(c: char) -> bool {
    CONSONANT_WEIGHTS.iter().any(|(v, _)| *v == c)
}

/// The letters offered in a letters round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterPool {
    letters: Vec<char>,
}

impl LetterPool {
    /// Generate the standard 5 vowel / 4 consonant pool.
    pub fn generate() -> Self {
        Self::generate_with_rng(&mut rand::rng(), DEFAULT_VOWELS, DEFAULT_CONSONANTS)
    }

    /// Generate a pool using a specific RNG (for testing/seeding).
    ///
    /// Each letter is drawn independently from its frequency table, so
    /// repeats are expected. The vowels and consonants are shuffled together.
    pub fn generate_with_rng<R: Rng>(rng: &mut R, vowels: usize, consonants: usize) -> Self {
        let mut letters: Vec<char> = Vec::with_capacity(vowels + consonants);
        letters.extend((0..vowels).map(|_| VOWEL_WEIGHTS[VOWEL_DIST.sample(rng)].0));
        letters.extend((0..consonants).map(|_| CONSONANT_WEIGHTS[CONSONANT_DIST.sample(rng)].0));
        letters.shuffle(rng);

        Self { letters }
    }

    pub fn vowel_count(&self) -> usize {
        self.letters.iter().filter(|c| is_vowel(**c)).count()
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn into_letters(self) -> Vec<char> {
        self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn as_string(&self) -> String {
        self.letters.iter().collect()
    }
}

/// The numbers and target offered in a numbers round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPool {
    numbers: Vec<i64>,
    target: i64,
}

impl NumberPool {
    pub fn generate() -> Self {
        Self::generate_with_rng(&mut rand::rng())
    }

    /// Two large and four small numbers, each group drawn without
    /// replacement, plus an independent target in 100..=999.
    /// No exact solution is guaranteed.
    pub fn generate_with_rng<R: Rng>(rng: &mut R) -> Self {
        let mut numbers: Vec<i64> = LARGE_NUMBERS
            .choose_multiple(rng, LARGE_COUNT)
            .copied()
            .collect();
        numbers.extend(SMALL_NUMBERS.choose_multiple(rng, SMALL_COUNT).copied());
        numbers.shuffle(rng);

        let target = rng.random_range(MIN_TARGET..=MAX_TARGET);

        Self { numbers, target }
    }

    pub fn numbers(&self) -> &[i64] {
        &self.numbers
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn into_parts(self) -> (Vec<i64>, i64) {
        (self.numbers, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_letter_pool_size_and_split() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pool = LetterPool::generate_with_rng(&mut rng, DEFAULT_VOWELS, DEFAULT_CONSONANTS);
            assert_eq!(pool.len(), DEFAULT_VOWELS + DEFAULT_CONSONANTS);
            assert_eq!(pool.vowel_count(), DEFAULT_VOWELS);
            for c in pool.letters() {
                assert!(is_vowel(*c) || is_consonant(*c), "unexpected letter {}", c);
            }
        }
    }

    #[test]
    fn test_letter_pool_custom_split() {
        let mut rng = StdRng::seed_from_u64(9);
        let pool = LetterPool::generate_with_rng(&mut rng, 3, 6);
        assert_eq!(pool.len(), 9);
        assert_eq!(pool.vowel_count(), 3);

        let empty = LetterPool::generate_with_rng(&mut rng, 0, 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_letter_pool_is_uppercase() {
        for _ in 0..50 {
            let pool = LetterPool::generate();
            assert!(pool.letters().iter().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_seeded_letter_pool_is_deterministic() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        let pool1 = LetterPool::generate_with_rng(&mut rng1, 5, 4);
        let pool2 = LetterPool::generate_with_rng(&mut rng2, 5, 4);

        assert_eq!(pool1.as_string(), pool2.as_string());
    }

    #[test]
    fn test_number_pool_shape() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pool = NumberPool::generate_with_rng(&mut rng);
            assert_eq!(pool.numbers().len(), LARGE_COUNT + SMALL_COUNT);
            assert!((MIN_TARGET..=MAX_TARGET).contains(&pool.target()));

            let large: Vec<_> = pool.numbers().iter().filter(|n| **n > 10).collect();
            assert_eq!(large.len(), LARGE_COUNT);
            assert_ne!(large[0], large[1], "large numbers are drawn without replacement");
            for n in pool.numbers() {
                assert!(LARGE_NUMBERS.contains(n) || (1..=10).contains(n));
            }
        }
    }

    #[test]
    fn test_small_numbers_at_most_twice() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pool = NumberPool::generate_with_rng(&mut rng);
            for n in 1..=10 {
                let copies = pool.numbers().iter().filter(|x| **x == n).count();
                assert!(copies <= 2, "{} appears {} times", n, copies);
            }
        }
    }

    #[test]
    fn test_round_type_display() {
        assert_eq!(RoundType::Letters.to_string(), "letters");
        assert_eq!(RoundType::Numbers.to_string(), "numbers");
    }
}
