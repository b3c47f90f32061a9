//! Scoring policy for both round types

use super::validation::ValidationResult;
use serde::{Deserialize, Serialize};

/// How close a numbers-round result landed, with the points it earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Exact,
    VeryClose,
    Close,
    Acceptable,
    Far,
    VeryFar,
}

/// Upper distance bound (inclusive) of each band, checked in order.
const BANDS: [(u64, ScoreBand); 5] = [
    (0, ScoreBand::Exact),
    (5, ScoreBand::VeryClose),
    (10, ScoreBand::Close),
    (25, ScoreBand::Acceptable),
    (50, ScoreBand::Far),
];

impl ScoreBand {
    pub fn for_distance(distance: u64) -> Self {
        BANDS
            .iter()
            .find(|(limit, _)| distance <= *limit)
            .map(|(_, band)| *band)
            .unwrap_or(ScoreBand::VeryFar)
    }

    pub fn points(self) -> u32 {
        match self {
            ScoreBand::Exact => 10,
            ScoreBand::VeryClose => 7,
            ScoreBand::Close => 5,
            ScoreBand::Acceptable => 3,
            ScoreBand::Far => 1,
            ScoreBand::VeryFar => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Exact => "Exact!",
            ScoreBand::VeryClose => "Very close",
            ScoreBand::Close => "Close",
            ScoreBand::Acceptable => "Acceptable",
            ScoreBand::Far => "Far",
            ScoreBand::VeryFar => "Too far",
        }
    }
}

/// Letters round: one point per character of a valid word, nothing otherwise.
/// `word` is expected in normalized form.
pub fn letters_points(verdict: &ValidationResult, word: &str) -> u32 {
    if verdict.is_valid() {
        word.chars().count() as u32
    } else {
        0
    }
}

pub fn distance(target: i64, result: i64) -> u64 {
    target.abs_diff(result)
}

/// Numbers round: points by distance between target and final result.
pub fn numbers_points(target: i64, result: i64) -> u32 {
    ScoreBand::for_distance(distance(target, result)).points()
}
