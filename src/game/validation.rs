//! Word validation for letters rounds
//!
//! Validates submitted words against:
//! - Letter availability in the pool (with multiplicity)
//! - Dictionary presence
//!
//! Both checks run on the normalized word (accents stripped, uppercased).
//! Empty input never reaches validation; callers reject it first.

use super::dictionary::{self, Dictionary};
use crate::error::{GameError, WordRejection};

/// Result of word validation with the specific reason for a rejection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Word is valid
    Valid,
    /// Word uses letters not available in the pool
    MissingLetters { missing: Vec<char> },
    /// Word not found in dictionary
    NotInDictionary,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The rejection reason, if any.
    pub fn rejection(&self) -> Option<WordRejection> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::MissingLetters { missing } => Some(WordRejection::MissingLetters {
                missing: missing.clone(),
            }),
            ValidationResult::NotInDictionary => Some(WordRejection::NotInDictionary),
        }
    }

    pub fn into_result(self) -> Result<(), GameError> {
        match self.rejection() {
            None => Ok(()),
            Some(rejection) => Err(GameError::InvalidWord(rejection)),
        }
    }
}

/// Validate a word against the pool and the embedded dictionary.
///
/// Checks in order:
/// 1. All letters available in the pool (with multiplicity)
/// 2. Word exists in dictionary
pub fn validate_word(word: &str, pool: &[char]) -> ValidationResult {
    validate_word_with(Dictionary::builtin(), word, pool)
}

/// Same as [`validate_word`] against an explicit dictionary.
pub fn validate_word_with(dict: &Dictionary, word: &str, pool: &[char]) -> ValidationResult {
    let normalized = dictionary::normalize(word);

    if let Some(missing) = check_letters_available(&normalized, pool) {
        return ValidationResult::MissingLetters { missing };
    }

    if !dict.contains(&normalized) {
        return ValidationResult::NotInDictionary;
    }

    ValidationResult::Valid
}

/// Boolean form of [`validate_word`].
pub fn is_valid_word(word: &str, pool: &[char]) -> bool {
    validate_word(word, pool).is_valid()
}

/// Check if all letters in the normalized word are available in the pool,
/// each pool letter usable once.
/// Returns None if valid, Some(missing_letters) if not.
fn check_letters_available(word: &str, pool: &[char]) -> Option<Vec<char>> {
    let mut available: Vec<char> = pool.iter().map(|c| c.to_ascii_uppercase()).collect();
    let mut missing: Vec<char> = Vec::new();

    for c in word.chars() {
        if let Some(pos) = available.iter().position(|&r| r == c) {
            available.swap_remove(pos);
        } else {
            missing.push(c);
        }
    }

    if missing.is_empty() {
        None
    } else {
        // Deduplicate missing letters while preserving order
        let mut seen = std::collections::HashSet::new();
        missing.retain(|c| seen.insert(*c));
        Some(missing)
    }
}
