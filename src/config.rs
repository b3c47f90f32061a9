#![allow(dead_code)]
//! Game configuration: players, rounds, round type mix and round times

use crate::error::{GameError, Result};
use crate::game::RoundType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const MIN_ROUNDS: u32 = 1;
pub const MAX_ROUNDS: u32 = 10;
pub const MIN_ROUND_SECS: u32 = 15;
pub const MAX_LETTERS_ROUND_SECS: u32 = 120;
pub const MAX_NUMBERS_ROUND_SECS: u32 = 180;

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Cumulative score over completed rounds
    #[serde(default)]
    pub score: u32,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            score: 0,
        }
    }
}

/// Which kinds of rounds a game plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Letters,
    Numbers,
    /// Alternates, starting with letters
    Mixed,
}

impl GameType {
    /// Resolve the type of a (1-based) round.
    pub fn round_type(self, round: u32) -> RoundType {
        match self {
            GameType::Letters => RoundType::Letters,
            GameType::Numbers => RoundType::Numbers,
            GameType::Mixed if round % 2 == 1 => RoundType::Letters,
            GameType::Mixed => RoundType::Numbers,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameType::Letters => "Letters",
            GameType::Numbers => "Numbers",
            GameType::Mixed => "Mixed",
        }
    }

    /// Cycle used by the setup screen.
    pub fn next(self) -> Self {
        match self {
            GameType::Letters => GameType::Numbers,
            GameType::Numbers => GameType::Mixed,
            GameType::Mixed => GameType::Letters,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            GameType::Letters => GameType::Mixed,
            GameType::Numbers => GameType::Letters,
            GameType::Mixed => GameType::Numbers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub players: Vec<Player>,
    pub rounds: u32,
    pub game_type: GameType,
    pub letters_round_secs: u32,
    pub numbers_round_secs: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: vec![Player::new("1", "Jugador 1"), Player::new("2", "Jugador 2")],
            rounds: 3,
            game_type: GameType::Mixed,
            letters_round_secs: 60,
            numbers_round_secs: 90,
        }
    }
}

impl GameConfig {
    /// Build a roster from display names, assigning ids "1", "2", ...
    pub fn with_player_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.players = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Player::new((i + 1).to_string(), name))
            .collect();
        self
    }

    /// Round time for a round type, in seconds.
    pub fn round_secs(&self, round_type: RoundType) -> u32 {
        match round_type {
            RoundType::Letters => self.letters_round_secs,
            RoundType::Numbers => self.numbers_round_secs,
        }
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Check roster size, id uniqueness, names, round count and times.
    pub fn validate(&self) -> Result<()> {
        let count = self.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(GameError::InvalidConfig(format!(
                "{} players, need {}-{}",
                count, MIN_PLAYERS, MAX_PLAYERS
            )));
        }

        let mut ids = HashSet::new();
        for player in &self.players {
            if player.id.trim().is_empty() {
                return Err(GameError::InvalidConfig("player without id".to_string()));
            }
            if !ids.insert(player.id.as_str()) {
                return Err(GameError::InvalidConfig(format!(
                    "duplicate player id {}",
                    player.id
                )));
            }
            if player.name.trim().is_empty() {
                return Err(GameError::InvalidConfig(format!(
                    "player {} has an empty name",
                    player.id
                )));
            }
        }

        if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&self.rounds) {
            return Err(GameError::InvalidConfig(format!(
                "{} rounds, need {}-{}",
                self.rounds, MIN_ROUNDS, MAX_ROUNDS
            )));
        }
        if !(MIN_ROUND_SECS..=MAX_LETTERS_ROUND_SECS).contains(&self.letters_round_secs) {
            return Err(GameError::InvalidConfig(format!(
                "letters round time {}s, need {}-{}s",
                self.letters_round_secs, MIN_ROUND_SECS, MAX_LETTERS_ROUND_SECS
            )));
        }
        if !(MIN_ROUND_SECS..=MAX_NUMBERS_ROUND_SECS).contains(&self.numbers_round_secs) {
            return Err(GameError::InvalidConfig(format!(
                "numbers round time {}s, need {}-{}s",
                self.numbers_round_secs, MIN_ROUND_SECS, MAX_NUMBERS_ROUND_SECS
            )));
        }

        Ok(())
    }
}
