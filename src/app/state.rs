#![allow(dead_code)]
//! Game state machine
//!
//! One `GameState` value holds everything a game needs: configuration,
//! round phase, round content, turn order, per-round scores and the current
//! player's arithmetic work. The front-end owns the single instance, feeds it
//! player actions and persists it as a snapshot.
//!
//! Round phases:
//!
//! ```text
//! Initiated --start_round--> Started --activate_round--> Active --last turn--> Completed
//!     ^                                                                          |
//!     +---------------------------advance_round (more rounds)--------------------+
//! ```
//!
//! In `Started` the pool is visible but input is locked while the countdown
//! runs. `Active` accepts one submission per player in turn order.

use crate::config::{GameConfig, Player};
use crate::error::{GameError, Result};
use crate::game::arithmetic::{Applied, ArithmeticEngine, Operator, TokenId};
use crate::game::scoring::{self, ScoreBand};
use crate::game::validation::{validate_word, ValidationResult};
use crate::game::{dictionary, LetterPool, NumberPool, RoundType, DEFAULT_CONSONANTS, DEFAULT_VOWELS};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Phase of the current round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    /// Waiting for "start round"; no content yet
    #[default]
    Initiated,
    /// Content revealed, countdown running, input locked
    Started,
    /// Players submit in turn
    Active,
    /// Everyone has played; waiting for "advance"
    Completed,
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoundState::Initiated => "initiated",
            RoundState::Started => "started",
            RoundState::Active => "active",
            RoundState::Completed => "completed",
        };
        write!(f, "{}", label)
    }
}

/// What players work with in a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundContent {
    Letters { letters: Vec<char> },
    Numbers { numbers: Vec<i64>, target: i64 },
}

impl RoundContent {
    pub fn generate<R: Rng>(round_type: RoundType, rng: &mut R) -> Self {
        match round_type {
            RoundType::Letters => RoundContent::Letters {
                letters: LetterPool::generate_with_rng(rng, DEFAULT_VOWELS, DEFAULT_CONSONANTS)
                    .into_letters(),
            },
            RoundType::Numbers => {
                let (numbers, target) = NumberPool::generate_with_rng(rng).into_parts();
                RoundContent::Numbers { numbers, target }
            }
        }
    }

    pub fn round_type(&self) -> RoundType {
        match self {
            RoundContent::Letters { .. } => RoundType::Letters,
            RoundContent::Numbers { .. } => RoundType::Numbers,
        }
    }

    pub fn letters(&self) -> Option<&[char]> {
        match self {
            RoundContent::Letters { letters } => Some(letters),
            RoundContent::Numbers { .. } => None,
        }
    }

    pub fn numbers(&self) -> Option<(&[i64], i64)> {
        match self {
            RoundContent::Numbers { numbers, target } => Some((numbers, *target)),
            RoundContent::Letters { .. } => None,
        }
    }
}

/// The round being played
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundContext {
    pub index: u32,
    pub round_type: RoundType,
    pub content: RoundContent,
}

/// What a player handed in this round, kept for the end-of-round summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Submission {
    Word { word: String, valid: bool, points: u32 },
    Solution { trace: String, result: i64, band: ScoreBand, points: u32 },
    Passed,
}

impl Submission {
    pub fn points(&self) -> u32 {
        match self {
            Submission::Word { points, .. } | Submission::Solution { points, .. } => *points,
            Submission::Passed => 0,
        }
    }
}

/// Result of a word submission. An invalid word is still a submission: it
/// scores zero and the turn moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordOutcome {
    pub player_id: String,
    pub word: String,
    pub verdict: ValidationResult,
    pub points: u32,
    pub round_completed: bool,
}

impl WordOutcome {
    /// The `InvalidWord` signal for a rejected word.
    pub fn error(&self) -> Option<GameError> {
        self.verdict.rejection().map(GameError::InvalidWord)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionOutcome {
    pub player_id: String,
    pub result: i64,
    pub distance: u64,
    pub band: ScoreBand,
    pub points: u32,
    pub round_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundAdvance {
    NextRound { round: u32, round_type: RoundType },
    /// Last round folded in; standings are final
    GameOver { standings: Vec<Player> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    config: Option<GameConfig>,
    started: bool,
    finished: bool,
    current_round: u32,
    round_state: RoundState,
    round: Option<RoundContext>,
    turn_order: Vec<String>,
    turn_index: usize,
    round_scores: BTreeMap<String, u32>,
    submissions: BTreeMap<String, Submission>,
    workbench: Option<ArithmeticEngine>,
}

impl GameState {
    /// An unconfigured game.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a configuration. Any previous game is discarded;
    /// call [`GameState::start_game`] to begin.
    pub fn configure(&mut self, config: GameConfig) -> Result<()> {
        config.validate()?;
        info!(
            players = config.players.len(),
            rounds = config.rounds,
            game_type = config.game_type.label(),
            "game configured"
        );
        *self = Self {
            config: Some(config),
            ..Self::default()
        };
        Ok(())
    }

    /// Round 1, zeroed scores, fresh turn order.
    pub fn start_game<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        self.restart(rng)?;
        info!("game started");
        Ok(())
    }

    /// Back to round 1 with the same roster and settings.
    pub fn reset_game<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        self.restart(rng)?;
        info!("game reset");
        Ok(())
    }

    fn restart<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let config = self.config.as_mut().ok_or(GameError::NotConfigured)?;
        for player in &mut config.players {
            player.score = 0;
        }
        self.started = true;
        self.finished = false;
        self.current_round = 1;
        self.prepare_round(rng);
        Ok(())
    }

    /// Clear per-round data and reshuffle who plays first.
    fn prepare_round<R: Rng>(&mut self, rng: &mut R) {
        let mut order: Vec<String> = self
            .players()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        order.shuffle(rng);

        self.turn_order = order;
        self.turn_index = 0;
        self.round_state = RoundState::Initiated;
        self.round = None;
        self.round_scores.clear();
        self.submissions.clear();
        self.workbench = None;
    }

    /// Generate content for the current round and reveal it.
    pub fn start_round<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let round_type = self.ready_to_start()?;
        let content = RoundContent::generate(round_type, rng);
        self.open_round(content);
        Ok(())
    }

    /// Start the current round with given content (replays, fixed puzzles).
    pub fn start_round_with(&mut self, content: RoundContent) -> Result<()> {
        let round_type = self.ready_to_start()?;
        if content.round_type() != round_type {
            return Err(GameError::WrongRoundType(content.round_type()));
        }
        self.open_round(content);
        Ok(())
    }

    fn ready_to_start(&self) -> Result<RoundType> {
        let config = self.ensure_playing()?;
        self.ensure_phase(RoundState::Initiated)?;
        Ok(config.game_type.round_type(self.current_round))
    }

    fn open_round(&mut self, content: RoundContent) {
        let round_type = content.round_type();
        info!(round = self.current_round, %round_type, "round started");

        self.round = Some(RoundContext {
            index: self.current_round,
            round_type,
            content,
        });
        self.round_scores.clear();
        self.submissions.clear();
        self.turn_index = 0;
        self.workbench = None;
        self.round_state = RoundState::Started;
    }

    /// End the reveal phase and accept input.
    ///
    /// Returns `Ok(false)` when the round is already past `Started`, so a
    /// repeated notification changes nothing.
    pub fn activate_round(&mut self) -> Result<bool> {
        self.ensure_playing()?;
        match self.round_state {
            RoundState::Started => {
                self.round_state = RoundState::Active;
                self.workbench = self.fresh_workbench();
                info!(round = self.current_round, "round active");
                Ok(true)
            }
            RoundState::Active | RoundState::Completed => {
                debug!(state = %self.round_state, "activation ignored");
                Ok(false)
            }
            RoundState::Initiated => Err(GameError::NoActiveRound),
        }
    }

    /// Countdown callback. Safe to call any number of times.
    pub fn on_countdown_elapsed(&mut self) -> bool {
        self.activate_round().unwrap_or(false)
    }

    pub fn submit_word(&mut self, player_id: &str, word: &str) -> Result<WordOutcome> {
        self.ensure_turn(player_id, RoundType::Letters)?;

        let normalized = dictionary::normalize(word);
        if normalized.is_empty() {
            warn!(player = player_id, "empty word submission");
            return Err(GameError::EmptySubmission);
        }

        let letters = self
            .round
            .as_ref()
            .and_then(|r| r.content.letters())
            .ok_or(GameError::NoActiveRound)?;
        let verdict = validate_word(&normalized, letters);
        let points = scoring::letters_points(&verdict, &normalized);
        debug!(player = player_id, word = %normalized, valid = verdict.is_valid(), points, "word submitted");

        self.record(
            player_id,
            Submission::Word {
                word: normalized.clone(),
                valid: verdict.is_valid(),
                points,
            },
        );
        let round_completed = self.advance_turn();

        Ok(WordOutcome {
            player_id: player_id.to_string(),
            word: normalized,
            verdict,
            points,
            round_completed,
        })
    }

    /// Score the current player's last result and pass the turn.
    pub fn confirm_solution(&mut self, player_id: &str) -> Result<SolutionOutcome> {
        self.ensure_turn(player_id, RoundType::Numbers)?;

        let engine = self.workbench.as_ref().ok_or(GameError::NoActiveRound)?;
        let Some(result) = engine.final_result() else {
            warn!(player = player_id, "solution confirmed without operations");
            return Err(GameError::EmptySubmission);
        };
        let target = engine.target();
        let trace = engine.trace();

        let distance = scoring::distance(target, result);
        let band = ScoreBand::for_distance(distance);
        let points = band.points();
        debug!(player = player_id, result, target, points, "solution confirmed");

        self.record(
            player_id,
            Submission::Solution {
                trace,
                result,
                band,
                points,
            },
        );
        let round_completed = self.advance_turn();

        Ok(SolutionOutcome {
            player_id: player_id.to_string(),
            result,
            distance,
            band,
            points,
            round_completed,
        })
    }

    /// Give up the turn for zero points.
    pub fn pass_turn(&mut self, player_id: &str) -> Result<bool> {
        self.ensure_playing()?;
        self.ensure_phase(RoundState::Active)?;
        let round_type = self.round_type_in_play()?;
        self.ensure_turn(player_id, round_type)?;
        debug!(player = player_id, "turn passed");
        self.record(player_id, Submission::Passed);
        Ok(self.advance_turn())
    }

    pub fn select_first(&mut self, token: TokenId) -> Result<()> {
        self.workbench_mut()?.select_first(token)?;
        Ok(())
    }

    pub fn select_operator(&mut self, operator: Operator) -> Result<()> {
        self.workbench_mut()?.select_operator(operator)?;
        Ok(())
    }

    pub fn select_second(&mut self, token: TokenId) -> Result<()> {
        self.workbench_mut()?.select_second(token)?;
        Ok(())
    }

    pub fn apply_selection(&mut self) -> Result<Applied> {
        let applied = self.workbench_mut()?.apply()?;
        debug!(operation = %applied.record, exact = applied.exact, "operation applied");
        Ok(applied)
    }

    /// Combine two available numbers in one step.
    pub fn submit_arithmetic_operation(
        &mut self,
        first: TokenId,
        operator: Operator,
        second: TokenId,
    ) -> Result<Applied> {
        match self.workbench_mut()?.perform(first, operator, second) {
            Ok(applied) => {
                debug!(operation = %applied.record, exact = applied.exact, "operation applied");
                Ok(applied)
            }
            Err(e) => {
                warn!(error = %e, "operation rejected");
                Err(e)
            }
        }
    }

    /// Drop the pending selection, keep the work done so far.
    pub fn clear_selection(&mut self) -> Result<()> {
        self.workbench_mut()?.clear();
        Ok(())
    }

    /// Throw away the current player's work and start again from the pool.
    pub fn clear_current_work(&mut self) -> Result<()> {
        self.workbench_mut()?.reset_all();
        debug!("current work cleared");
        Ok(())
    }

    /// Fold round scores into totals, then either set up the next round or
    /// finish the game.
    pub fn advance_round<R: Rng>(&mut self, rng: &mut R) -> Result<RoundAdvance> {
        let config = self.ensure_playing()?;
        let last_round = self.current_round >= config.rounds;
        let game_type = config.game_type;
        self.ensure_phase(RoundState::Completed)?;

        let round_scores = std::mem::take(&mut self.round_scores);
        if let Some(config) = self.config.as_mut() {
            for player in &mut config.players {
                player.score += round_scores.get(&player.id).copied().unwrap_or(0);
            }
        }

        if last_round {
            self.finished = true;
            self.workbench = None;
            let standings = self.standings();
            info!(
                winner = standings.first().map(|p| p.name.as_str()).unwrap_or(""),
                "game over"
            );
            return Ok(RoundAdvance::GameOver { standings });
        }

        self.current_round += 1;
        self.prepare_round(rng);
        let round_type = game_type.round_type(self.current_round);
        info!(round = self.current_round, %round_type, "advanced to next round");

        Ok(RoundAdvance::NextRound {
            round: self.current_round,
            round_type,
        })
    }

    // Guards

    fn ensure_playing(&self) -> Result<&GameConfig> {
        let config = self.config.as_ref().ok_or(GameError::NotConfigured)?;
        if !self.started {
            return Err(GameError::NoActiveRound);
        }
        if self.finished {
            return Err(GameError::GameFinished);
        }
        Ok(config)
    }

    fn ensure_phase(&self, expected: RoundState) -> Result<()> {
        if self.round_state != expected {
            return Err(GameError::WrongPhase(self.round_state));
        }
        Ok(())
    }

    fn round_type_in_play(&self) -> Result<RoundType> {
        self.round
            .as_ref()
            .map(|r| r.round_type)
            .ok_or(GameError::NoActiveRound)
    }

    fn ensure_turn(&self, player_id: &str, round_type: RoundType) -> Result<()> {
        self.ensure_playing()?;
        self.ensure_phase(RoundState::Active)?;
        let in_play = self.round_type_in_play()?;
        if in_play != round_type {
            return Err(GameError::WrongRoundType(in_play));
        }
        if self.current_player_id() != Some(player_id) {
            return Err(GameError::NotPlayersTurn(player_id.to_string()));
        }
        Ok(())
    }

    fn workbench_mut(&mut self) -> Result<&mut ArithmeticEngine> {
        self.ensure_playing()?;
        self.ensure_phase(RoundState::Active)?;
        let in_play = self.round_type_in_play()?;
        if in_play != RoundType::Numbers {
            return Err(GameError::WrongRoundType(in_play));
        }
        self.workbench.as_mut().ok_or(GameError::NoActiveRound)
    }

    fn fresh_workbench(&self) -> Option<ArithmeticEngine> {
        self.round
            .as_ref()
            .and_then(|r| r.content.numbers())
            .map(|(numbers, target)| ArithmeticEngine::new(numbers, target))
    }

    fn record(&mut self, player_id: &str, submission: Submission) {
        self.round_scores
            .insert(player_id.to_string(), submission.points());
        self.submissions.insert(player_id.to_string(), submission);
    }

    /// Move to the next player. Returns true when that completed the round.
    fn advance_turn(&mut self) -> bool {
        self.turn_index += 1;
        if self.turn_index >= self.turn_order.len() {
            self.round_state = RoundState::Completed;
            self.workbench = None;
            info!(round = self.current_round, "round completed");
            return true;
        }
        self.workbench = self.fresh_workbench();
        false
    }

    // Accessors

    pub fn config(&self) -> Option<&GameConfig> {
        self.config.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn players(&self) -> &[Player] {
        self.config
            .as_ref()
            .map(|c| c.players.as_slice())
            .unwrap_or(&[])
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players().iter().find(|p| p.id == id)
    }

    pub fn round_state(&self) -> RoundState {
        self.round_state
    }

    pub fn round(&self) -> Option<&RoundContext> {
        self.round.as_ref()
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.config.as_ref().map(|c| c.rounds).unwrap_or(0)
    }

    /// Type of the current round, known even before its content exists.
    pub fn current_round_type(&self) -> Option<RoundType> {
        let config = self.config.as_ref()?;
        if !self.started {
            return None;
        }
        Some(config.game_type.round_type(self.current_round))
    }

    /// Countdown length for the current round.
    pub fn round_secs(&self) -> Option<u32> {
        let round_type = self.current_round_type()?;
        self.config.as_ref().map(|c| c.round_secs(round_type))
    }

    pub fn round_scores(&self) -> &BTreeMap<String, u32> {
        &self.round_scores
    }

    pub fn round_score(&self, player_id: &str) -> Option<u32> {
        self.round_scores.get(player_id).copied()
    }

    pub fn submissions(&self) -> &BTreeMap<String, Submission> {
        &self.submissions
    }

    pub fn submission(&self, player_id: &str) -> Option<&Submission> {
        self.submissions.get(player_id)
    }

    pub fn turn_order(&self) -> &[String] {
        &self.turn_order
    }

    /// Whose turn it is. Only set while the round is active.
    pub fn current_player_id(&self) -> Option<&str> {
        if self.round_state != RoundState::Active {
            return None;
        }
        self.turn_order.get(self.turn_index).map(String::as_str)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current_player_id().and_then(|id| self.player(id))
    }

    pub fn workbench(&self) -> Option<&ArithmeticEngine> {
        self.workbench.as_ref()
    }

    /// Players by total score, highest first; ties keep seating order.
    pub fn standings(&self) -> Vec<Player> {
        let mut players = self.players().to_vec();
        players.sort_by(|a, b| b.score.cmp(&a.score));
        players
    }

    // Snapshots

    pub fn to_snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore a snapshot. Missing fields take their defaults; a snapshot
    /// without a configuration is an unconfigured game.
    pub fn from_snapshot(json: &str) -> serde_json::Result<Self> {
        let state: GameState = serde_json::from_str(json)?;
        if state.config.is_none() {
            return Ok(Self::default());
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameType;
    use crate::error::{OperationFault, SelectionFault};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn config(game_type: GameType, rounds: u32) -> GameConfig {
        GameConfig {
            rounds,
            game_type,
            ..GameConfig::default()
        }
        .with_player_names(["Ana", "Luis"])
    }

    fn started(game_type: GameType, rounds: u32) -> GameState {
        let mut game = GameState::new();
        game.configure(config(game_type, rounds)).unwrap();
        game.start_game(&mut rng()).unwrap();
        game
    }

    fn letters_round(game: &mut GameState) {
        game.start_round_with(RoundContent::Letters {
            letters: "TOMATERSL".chars().collect(),
        })
        .unwrap();
        assert!(game.activate_round().unwrap());
    }

    fn numbers_round(game: &mut GameState) {
        game.start_round_with(RoundContent::Numbers {
            numbers: vec![100, 75, 8, 2, 7, 3],
            target: 527,
        })
        .unwrap();
        assert!(game.activate_round().unwrap());
    }

    fn current(game: &GameState) -> String {
        game.current_player_id().unwrap().to_string()
    }

    fn token(game: &GameState, value: i64) -> TokenId {
        game.workbench()
            .unwrap()
            .tokens()
            .iter()
            .find(|t| t.value == value)
            .map(|t| t.id)
            .unwrap()
    }

    #[test]
    fn test_unconfigured_requests_setup() {
        let mut game = GameState::new();
        assert_eq!(game.start_round(&mut rng()), Err(GameError::NotConfigured));
        assert_eq!(game.start_game(&mut rng()), Err(GameError::NotConfigured));
        assert_eq!(game.activate_round(), Err(GameError::NotConfigured));
        assert!(game.submit_word("1", "casa").unwrap_err().needs_setup());
        assert!(game.players().is_empty());
    }

    #[test]
    fn test_configured_but_not_started() {
        let mut game = GameState::new();
        game.configure(config(GameType::Letters, 1)).unwrap();
        assert_eq!(game.start_round(&mut rng()), Err(GameError::NoActiveRound));
        assert_eq!(game.current_round_type(), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut game = GameState::new();
        let bad = GameConfig::default().with_player_names(["Solo"]);
        assert!(matches!(game.configure(bad), Err(GameError::InvalidConfig(_))));
        assert!(!game.is_configured());
    }

    #[test]
    fn test_start_game_sets_round_one() {
        let game = started(GameType::Mixed, 3);
        assert_eq!(game.current_round(), 1);
        assert_eq!(game.round_state(), RoundState::Initiated);
        assert_eq!(game.current_round_type(), Some(RoundType::Letters));
        assert_eq!(game.round_secs(), Some(60));
        assert!(game.round().is_none());

        let mut order = game.turn_order().to_vec();
        order.sort();
        assert_eq!(order, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_start_round_generates_content_for_type() {
        let mut game = started(GameType::Numbers, 2);
        game.start_round(&mut rng()).unwrap();
        assert_eq!(game.round_state(), RoundState::Started);

        let round = game.round().unwrap();
        assert_eq!(round.index, 1);
        assert_eq!(round.round_type, RoundType::Numbers);
        let (numbers, target) = round.content.numbers().unwrap();
        assert_eq!(numbers.len(), 6);
        assert!((100..=999).contains(&target));
    }

    #[test]
    fn test_start_round_only_from_initiated() {
        let mut game = started(GameType::Letters, 1);
        game.start_round(&mut rng()).unwrap();
        assert_eq!(
            game.start_round(&mut rng()),
            Err(GameError::WrongPhase(RoundState::Started))
        );
    }

    #[test]
    fn test_start_round_with_wrong_type() {
        let mut game = started(GameType::Letters, 1);
        let result = game.start_round_with(RoundContent::Numbers {
            numbers: vec![1, 2, 3, 4, 25, 50],
            target: 300,
        });
        assert_eq!(result, Err(GameError::WrongRoundType(RoundType::Numbers)));
        assert_eq!(game.round_state(), RoundState::Initiated);
    }

    #[test]
    fn test_input_locked_during_reveal() {
        let mut game = started(GameType::Letters, 1);
        game.start_round_with(RoundContent::Letters {
            letters: "TOMATERSL".chars().collect(),
        })
        .unwrap();

        let first = game.turn_order()[0].clone();
        assert_eq!(
            game.submit_word(&first, "tomate"),
            Err(GameError::WrongPhase(RoundState::Started))
        );
        assert_eq!(game.current_player_id(), None);
    }

    #[test]
    fn test_duplicate_countdown_notification_is_ignored() {
        let mut game = started(GameType::Letters, 1);
        game.start_round(&mut rng()).unwrap();

        assert!(game.on_countdown_elapsed());
        let first = current(&game);
        assert!(!game.on_countdown_elapsed());
        assert_eq!(game.activate_round(), Ok(false));

        assert_eq!(game.round_state(), RoundState::Active);
        assert_eq!(current(&game), first);
    }

    #[test]
    fn test_countdown_before_start_is_ignored() {
        let mut game = started(GameType::Letters, 1);
        assert!(!game.on_countdown_elapsed());
        assert_eq!(game.round_state(), RoundState::Initiated);
    }

    #[test]
    fn test_one_round_letters_game() {
        let mut game = started(GameType::Letters, 1);
        letters_round(&mut game);

        while let Some(id) = game.current_player_id().map(str::to_string) {
            let word = if id == "1" { "tomate" } else { "zzz" };
            let outcome = game.submit_word(&id, word).unwrap();
            if id == "1" {
                assert_eq!(outcome.points, 6);
                assert!(outcome.error().is_none());
            } else {
                assert_eq!(outcome.points, 0);
                assert!(matches!(outcome.error(), Some(GameError::InvalidWord(_))));
            }
        }

        assert_eq!(game.round_state(), RoundState::Completed);
        assert_eq!(game.round_score("1"), Some(6));
        assert_eq!(game.round_score("2"), Some(0));

        let advance = game.advance_round(&mut rng()).unwrap();
        assert!(matches!(advance, RoundAdvance::GameOver { .. }));
        assert_eq!(game.player("1").unwrap().score, 6);
        assert_eq!(game.player("2").unwrap().score, 0);
        assert!(game.is_finished());
        assert_ne!(game.round_state(), RoundState::Initiated);
        assert!(game.round_scores().is_empty());
        assert_eq!(game.start_round(&mut rng()), Err(GameError::GameFinished));
    }

    #[test]
    fn test_last_submission_completes_round() {
        let mut game = started(GameType::Letters, 1);
        letters_round(&mut game);

        let first = current(&game);
        let outcome = game.submit_word(&first, "toma").unwrap();
        assert!(!outcome.round_completed);
        assert_eq!(game.round_state(), RoundState::Active);

        let second = current(&game);
        assert_ne!(first, second);
        let outcome = game.submit_word(&second, "mate").unwrap();
        assert!(outcome.round_completed);
        assert_eq!(game.current_player_id(), None);
        assert_eq!(
            game.submit_word(&second, "mate"),
            Err(GameError::WrongPhase(RoundState::Completed))
        );
    }

    #[test]
    fn test_empty_word_is_rejected_without_advancing() {
        let mut game = started(GameType::Letters, 1);
        letters_round(&mut game);

        let first = current(&game);
        assert_eq!(game.submit_word(&first, "   "), Err(GameError::EmptySubmission));
        assert_eq!(current(&game), first);
        assert!(game.round_scores().is_empty());
    }

    #[test]
    fn test_out_of_turn_submission() {
        let mut game = started(GameType::Letters, 1);
        letters_round(&mut game);

        let waiting = game.turn_order()[1].clone();
        assert_eq!(
            game.submit_word(&waiting, "tomate"),
            Err(GameError::NotPlayersTurn(waiting.clone()))
        );
    }

    #[test]
    fn test_word_submissions_are_recorded() {
        let mut game = started(GameType::Letters, 1);
        letters_round(&mut game);

        let first = current(&game);
        game.submit_word(&first, "Tomáte").unwrap();
        assert_eq!(
            game.submission(&first),
            Some(&Submission::Word {
                word: "TOMATE".to_string(),
                valid: true,
                points: 6
            })
        );
    }

    #[test]
    fn test_numbers_round_flow() {
        let mut game = started(GameType::Numbers, 1);
        numbers_round(&mut game);

        let first = current(&game);
        assert_eq!(game.confirm_solution(&first), Err(GameError::EmptySubmission));

        let product = game
            .submit_arithmetic_operation(token(&game, 75), Operator::Multiply, token(&game, 7))
            .unwrap();
        assert_eq!(product.value, 525);
        let sum = game
            .submit_arithmetic_operation(product.token, Operator::Add, token(&game, 2))
            .unwrap();
        assert!(sum.exact);
        // Exact hit does not end the turn by itself
        assert_eq!(current(&game), first);

        let outcome = game.confirm_solution(&first).unwrap();
        assert_eq!(outcome.points, 10);
        assert_eq!(outcome.band, ScoreBand::Exact);
        assert!(!outcome.round_completed);

        // Next player starts from the full pool
        let second = current(&game);
        let bench = game.workbench().unwrap();
        assert_eq!(bench.tokens().len(), 6);
        assert!(bench.log().is_empty());

        game.submit_arithmetic_operation(token(&game, 100), Operator::Add, token(&game, 3))
            .unwrap();
        let outcome = game.confirm_solution(&second).unwrap();
        assert_eq!(outcome.result, 103);
        assert_eq!(outcome.distance, 424);
        assert_eq!(outcome.points, 0);
        assert!(outcome.round_completed);
        assert!(game.workbench().is_none());

        game.advance_round(&mut rng()).unwrap();
        assert_eq!(game.player(&first).unwrap().score, 10);
        assert_eq!(game.player(&second).unwrap().score, 0);
    }

    #[test]
    fn test_invalid_division_is_a_no_op() {
        let mut game = started(GameType::Numbers, 1);
        numbers_round(&mut game);

        let before = game.workbench().unwrap().clone();
        let result = game.submit_arithmetic_operation(token(&game, 7), Operator::Divide, token(&game, 2));
        assert_eq!(
            result,
            Err(GameError::InvalidOperation(OperationFault::NonIntegerDivision {
                dividend: 7,
                divisor: 2
            }))
        );
        assert_eq!(game.workbench().unwrap().tokens(), before.tokens());
        assert!(game.workbench().unwrap().log().is_empty());
    }

    #[test]
    fn test_step_by_step_selection() {
        let mut game = started(GameType::Numbers, 1);
        numbers_round(&mut game);

        assert_eq!(
            game.select_operator(Operator::Add),
            Err(GameError::IllegalSelection(SelectionFault::OperatorBeforeOperand))
        );
        game.select_first(token(&game, 8)).unwrap();
        game.select_operator(Operator::Divide).unwrap();
        game.select_second(token(&game, 2)).unwrap();
        let applied = game.apply_selection().unwrap();
        assert_eq!(applied.value, 4);

        game.select_first(token(&game, 4)).unwrap();
        game.clear_selection().unwrap();
        assert!(game.workbench().unwrap().selection().is_empty());
        assert_eq!(game.workbench().unwrap().tokens().len(), 5);

        game.clear_current_work().unwrap();
        assert_eq!(game.workbench().unwrap().tokens().len(), 6);
        assert_eq!(game.workbench().unwrap().final_result(), None);
    }

    #[test]
    fn test_arithmetic_in_letters_round() {
        let mut game = started(GameType::Letters, 1);
        letters_round(&mut game);
        assert_eq!(
            game.clear_current_work(),
            Err(GameError::WrongRoundType(RoundType::Letters))
        );
        let first = current(&game);
        assert_eq!(
            game.confirm_solution(&first),
            Err(GameError::WrongRoundType(RoundType::Letters))
        );
    }

    #[test]
    fn test_pass_turn_scores_zero() {
        let mut game = started(GameType::Numbers, 1);
        numbers_round(&mut game);

        let first = current(&game);
        assert!(!game.pass_turn(&first).unwrap());
        assert_eq!(game.round_score(&first), Some(0));
        assert_eq!(game.submission(&first), Some(&Submission::Passed));
        let second = current(&game);
        assert!(game.pass_turn(&second).unwrap());
        assert_eq!(game.round_state(), RoundState::Completed);
    }

    #[test]
    fn test_advance_requires_completed_round() {
        let mut game = started(GameType::Letters, 2);
        assert_eq!(
            game.advance_round(&mut rng()),
            Err(GameError::WrongPhase(RoundState::Initiated))
        );
        letters_round(&mut game);
        assert_eq!(
            game.advance_round(&mut rng()),
            Err(GameError::WrongPhase(RoundState::Active))
        );
    }

    #[test]
    fn test_mixed_game_alternates_and_accumulates() {
        let mut game = started(GameType::Mixed, 3);
        let mut rng = StdRng::seed_from_u64(99);

        letters_round(&mut game);
        while let Some(id) = game.current_player_id().map(str::to_string) {
            game.submit_word(&id, "mate").unwrap();
        }
        let advance = game.advance_round(&mut rng).unwrap();
        assert_eq!(
            advance,
            RoundAdvance::NextRound {
                round: 2,
                round_type: RoundType::Numbers
            }
        );
        assert_eq!(game.round_state(), RoundState::Initiated);
        assert!(game.round().is_none());
        assert!(game.submissions().is_empty());
        assert_eq!(game.round_secs(), Some(90));

        numbers_round(&mut game);
        while let Some(id) = game.current_player_id().map(str::to_string) {
            game.pass_turn(&id).unwrap();
        }
        let advance = game.advance_round(&mut rng).unwrap();
        assert_eq!(
            advance,
            RoundAdvance::NextRound {
                round: 3,
                round_type: RoundType::Letters
            }
        );

        assert_eq!(game.player("1").unwrap().score, 4);
        assert_eq!(game.player("2").unwrap().score, 4);
    }

    #[test]
    fn test_turn_order_is_permutation_each_round() {
        let mut game = GameState::new();
        game.configure(
            GameConfig {
                rounds: 10,
                game_type: GameType::Letters,
                ..GameConfig::default()
            }
            .with_player_names(["A", "B", "C", "D"]),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        game.start_game(&mut rng).unwrap();

        let mut firsts = std::collections::HashSet::new();
        for _ in 0..9 {
            let mut order = game.turn_order().to_vec();
            firsts.insert(order[0].clone());
            order.sort();
            assert_eq!(order, vec!["1", "2", "3", "4"]);

            game.start_round(&mut rng).unwrap();
            game.activate_round().unwrap();
            while let Some(id) = game.current_player_id().map(str::to_string) {
                game.pass_turn(&id).unwrap();
            }
            game.advance_round(&mut rng).unwrap();
        }
        assert!(firsts.len() > 1, "turn order never changed");
    }

    #[test]
    fn test_reset_game_keeps_roster() {
        let mut game = started(GameType::Letters, 2);
        letters_round(&mut game);
        while let Some(id) = game.current_player_id().map(str::to_string) {
            game.submit_word(&id, "tomate").unwrap();
        }
        game.advance_round(&mut rng()).unwrap();
        assert_eq!(game.current_round(), 2);
        assert_eq!(game.player("1").unwrap().score, 6);

        game.reset_game(&mut rng()).unwrap();
        assert_eq!(game.current_round(), 1);
        assert_eq!(game.round_state(), RoundState::Initiated);
        assert!(game.players().iter().all(|p| p.score == 0));
        assert_eq!(game.players().len(), 2);
        assert_eq!(game.player("2").unwrap().name, "Luis");
        assert!(!game.is_finished());
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut game = started(GameType::Letters, 1);
        letters_round(&mut game);
        while let Some(id) = game.current_player_id().map(str::to_string) {
            game.pass_turn(&id).unwrap();
        }
        game.advance_round(&mut rng()).unwrap();
        assert!(game.is_finished());

        game.reset_game(&mut rng()).unwrap();
        assert!(!game.is_finished());
        assert!(game.start_round(&mut rng()).is_ok());
    }

    #[test]
    fn test_standings_order() {
        let mut game = GameState::new();
        let mut config = config(GameType::Letters, 1).with_player_names(["Ana", "Luis", "Eva"]);
        config.players[0].score = 3;
        config.players[1].score = 8;
        config.players[2].score = 3;
        game.configure(config).unwrap();

        let names: Vec<_> = game.standings().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Luis", "Ana", "Eva"]);
    }

    #[test]
    fn test_snapshot_round_trip_mid_turn() {
        let mut game = started(GameType::Numbers, 2);
        numbers_round(&mut game);
        game.submit_arithmetic_operation(token(&game, 100), Operator::Add, token(&game, 3))
            .unwrap();
        game.select_first(token(&game, 8)).unwrap();

        let json = game.to_snapshot().unwrap();
        let restored = GameState::from_snapshot(&json).unwrap();
        assert_eq!(restored, game);
        assert_eq!(restored.workbench().unwrap().final_result(), Some(103));
    }

    #[test]
    fn test_snapshot_defensive_defaults() {
        let empty = GameState::from_snapshot("{}").unwrap();
        assert!(!empty.is_configured());
        assert_eq!(empty.round_state(), RoundState::Initiated);

        let no_config = GameState::from_snapshot(r#"{"started":true,"current_round":4}"#).unwrap();
        assert!(!no_config.is_configured());
        assert_eq!(no_config.current_round(), 0);

        assert!(GameState::from_snapshot("not json").is_err());
    }
}
