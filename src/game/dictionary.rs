//! Dictionary module for word validation
//!
//! Embeds a Spanish word list at build time. Entries and lookups go through
//! the same normalization (diacritics stripped, uppercased) so "café",
//! "CAFE" and "Cafe" are the same word.

use deunicode::deunicode_char;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Embedded word list, one word per line, accents allowed
static WORDS_DATA: &str = include_str!("../../data/palabras.txt");

static BUILTIN: Lazy<Dictionary> = Lazy::new(|| Dictionary::from_words(WORDS_DATA.lines()));

/// Latin-1 Supplement through Latin Extended-B, plus Latin Extended Additional.
const LATIN_RANGES: [RangeInclusive<char>; 2] = ['\u{00C0}'..='\u{024F}', '\u{1E00}'..='\u{1EFF}'];

const COMBINING_MARKS: RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Canonical form used for every comparison: surrounding whitespace
/// trimmed, diacritics stripped, uppercased.
///
/// Only accented Latin letters fold to their base letter. Anything else
/// outside ASCII (ligatures like `ß`, look-alikes from other scripts) is kept
/// as typed, so it never matches a dictionary entry or a pool letter.
pub fn normalize(word: &str) -> String {
    word.trim()
        .chars()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .map(fold_letter)
        .collect()
}

fn fold_letter(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_uppercase();
    }
    if !LATIN_RANGES.iter().any(|range| range.contains(&c)) {
        return c;
    }
    let mut folded = deunicode_char(c).unwrap_or_default().chars();
    match (folded.next(), folded.next()) {
        (Some(base), None) if base.is_ascii_alphabetic() => base.to_ascii_uppercase(),
        _ => c,
    }
}

/// A closed word list with O(1) normalized lookup.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// The embedded list, built on first use.
    pub fn builtin() -> &'static Dictionary {
        &BUILTIN
    }

    pub fn contains(&self, word: &str) -> bool {
        let key = normalize(word);
        !key.is_empty() && self.words.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Check a word against the embedded list.
pub fn is_valid_word(word: &str) -> bool {
    Dictionary::builtin().contains(word)
}
