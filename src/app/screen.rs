//! Application screen state management
//!
//! Handles transitions between the application screens:
//! - Setup (roster and game settings)
//! - Playing (rounds in progress)
//! - Results (final standings)
//! - Error
//!
//! The coordinator owns the single `GameState`, the reveal countdown and the
//! optional storage handle, and translates key presses into game operations.

use crate::config::{
    GameConfig, Player, MAX_LETTERS_ROUND_SECS, MAX_NUMBERS_ROUND_SECS, MAX_PLAYERS, MAX_ROUNDS,
    MIN_PLAYERS, MIN_ROUNDS, MIN_ROUND_SECS,
};
use crate::error::GameError;
use crate::game::arithmetic::Operator;
use crate::game::RoundType;
use crate::storage::{GameRecord, Storage};
use rand::rngs::StdRng;
use tracing::{info, warn};

use super::countdown::Countdown;
use super::state::{GameState, RoundAdvance, RoundState};

const MAX_NAME_LEN: usize = 12;
const MAX_WORD_LEN: usize = 16;
const SECS_STEP: i64 = 5;
const RECENT_GAMES: usize = 5;

/// A row of the setup form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupRow {
    Player(usize),
    Rounds,
    GameType,
    LettersSecs,
    NumbersSecs,
}

impl SetupRow {
    pub fn label(&self) -> String {
        match self {
            SetupRow::Player(i) => format!("Player {}", i + 1),
            SetupRow::Rounds => "Rounds".to_string(),
            SetupRow::GameType => "Game type".to_string(),
            SetupRow::LettersSecs => "Letters time".to_string(),
            SetupRow::NumbersSecs => "Numbers time".to_string(),
        }
    }
}

/// Editable roster and settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupForm {
    pub config: GameConfig,
    pub selected: usize,
    pub feedback: String,
}

impl SetupForm {
    pub fn new(mut config: GameConfig) -> Self {
        for player in &mut config.players {
            player.score = 0;
        }
        Self {
            config,
            selected: 0,
            feedback: String::new(),
        }
    }

    /// Player rows first, then the settings.
    pub fn rows(&self) -> Vec<SetupRow> {
        let mut rows: Vec<SetupRow> = (0..self.config.players.len())
            .map(SetupRow::Player)
            .collect();
        rows.extend([
            SetupRow::Rounds,
            SetupRow::GameType,
            SetupRow::LettersSecs,
            SetupRow::NumbersSecs,
        ]);
        rows
    }

    pub fn selected_row(&self) -> SetupRow {
        self.rows()
            .get(self.selected)
            .copied()
            .unwrap_or(SetupRow::Rounds)
    }

    pub fn value(&self, row: SetupRow) -> String {
        let config = &self.config;
        match row {
            SetupRow::Player(i) => config
                .players
                .get(i)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            SetupRow::Rounds => config.rounds.to_string(),
            SetupRow::GameType => config.game_type.label().to_string(),
            SetupRow::LettersSecs => format!("{} s", config.letters_round_secs),
            SetupRow::NumbersSecs => format!("{} s", config.numbers_round_secs),
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.selected + 1 < self.rows().len() {
            self.selected += 1;
        }
    }

    /// Step the selected setting; names are not adjustable.
    pub fn adjust(&mut self, delta: i64) {
        let row = self.selected_row();
        let config = &mut self.config;
        match row {
            SetupRow::Player(_) => {}
            SetupRow::Rounds => {
                config.rounds = step(config.rounds, delta, MIN_ROUNDS, MAX_ROUNDS);
            }
            SetupRow::GameType => {
                config.game_type = if delta > 0 {
                    config.game_type.next()
                } else {
                    config.game_type.previous()
                };
            }
            SetupRow::LettersSecs => {
                config.letters_round_secs = step(
                    config.letters_round_secs,
                    delta * SECS_STEP,
                    MIN_ROUND_SECS,
                    MAX_LETTERS_ROUND_SECS,
                );
            }
            SetupRow::NumbersSecs => {
                config.numbers_round_secs = step(
                    config.numbers_round_secs,
                    delta * SECS_STEP,
                    MIN_ROUND_SECS,
                    MAX_NUMBERS_ROUND_SECS,
                );
            }
        }
        self.feedback.clear();
    }

    pub fn push_char(&mut self, c: char) {
        if let SetupRow::Player(i) = self.selected_row() {
            if let Some(player) = self.config.players.get_mut(i) {
                if player.name.chars().count() < MAX_NAME_LEN && !c.is_control() {
                    player.name.push(c);
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        if let SetupRow::Player(i) = self.selected_row() {
            if let Some(player) = self.config.players.get_mut(i) {
                player.name.pop();
            }
        }
    }

    pub fn add_player(&mut self) {
        let count = self.config.players.len();
        if count >= MAX_PLAYERS {
            self.feedback = format!("At most {} players", MAX_PLAYERS);
            return;
        }
        self.config
            .players
            .push(Player::new("", format!("Jugador {}", count + 1)));
        self.renumber();
        self.selected = count;
    }

    /// Remove the selected player, or the last one when a setting is selected.
    pub fn remove_player(&mut self) {
        let count = self.config.players.len();
        if count <= MIN_PLAYERS {
            self.feedback = format!("At least {} players", MIN_PLAYERS);
            return;
        }
        let index = match self.selected_row() {
            SetupRow::Player(i) => i,
            _ => count - 1,
        };
        self.config.players.remove(index);
        self.renumber();
        self.selected = self.selected.min(self.rows().len() - 1);
    }

    fn renumber(&mut self) {
        for (i, player) in self.config.players.iter_mut().enumerate() {
            player.id = (i + 1).to_string();
        }
    }
}

fn step(value: u32, delta: i64, min: u32, max: u32) -> u32 {
    let stepped = (i64::from(value) + delta).clamp(i64::from(min), i64::from(max));
    stepped as u32
}

/// The current application screen
pub enum Screen {
    Setup(SetupForm),
    Playing,
    /// Game over
    Results {
        standings: Vec<Player>,
        games_played: Option<i64>,
        /// Latest finished games, newest first
        recent: Vec<GameRecord>,
    },
    Error {
        message: String,
    },
}

/// Main application coordinator
pub struct AppCoordinator {
    pub screen: Screen,
    pub game: GameState,
    /// Reveal countdown of the current round
    pub countdown: Option<Countdown>,
    /// Word being typed in a letters round
    pub input: String,
    /// Feedback line under the play area
    pub feedback: String,
    /// Feedback reports a rejected action
    pub feedback_alert: bool,
    pub should_quit: bool,
    rng: StdRng,
    storage: Option<Storage>,
}

impl AppCoordinator {
    /// Start at the setup screen, pre-filled with `config`.
    pub fn new(config: GameConfig, rng: StdRng, storage: Option<Storage>) -> Self {
        Self {
            screen: Screen::Setup(SetupForm::new(config)),
            game: GameState::new(),
            countdown: None,
            input: String::new(),
            feedback: String::new(),
            feedback_alert: false,
            should_quit: false,
            rng,
            storage,
        }
    }

    /// Continue a saved game in progress. Returns true if one was resumed.
    pub fn resume_saved(&mut self) -> bool {
        let Some(storage) = &self.storage else {
            return false;
        };

        match storage.load_snapshot() {
            Ok(Some(game)) if game.is_started() && !game.is_finished() => {
                info!(round = game.current_round(), state = %game.round_state(), "resuming saved game");
                self.countdown = match game.round_state() {
                    RoundState::Started => game.round_secs().map(Countdown::new),
                    _ => None,
                };
                self.game = game;
                self.feedback = "Saved game resumed".to_string();
                self.screen = Screen::Playing;
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!(error = %e, "discarding unreadable snapshot");
                if let Err(e) = storage.clear_snapshot() {
                    warn!(error = %e, "could not clear snapshot");
                }
                self.screen = Screen::Error {
                    message: format!("Saved game could not be restored: {}", e),
                };
                false
            }
        }
    }

    /// Forget any saved game.
    pub fn discard_saved(&self) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.clear_snapshot() {
                warn!(error = %e, "could not clear snapshot");
            }
        }
    }

    /// Save and quit the application
    pub fn quit(&mut self) {
        self.autosave();
        self.should_quit = true;
    }

    /// Back to setup, keeping the current roster and settings.
    pub fn go_to_setup(&mut self) {
        let config = self.game.config().cloned().unwrap_or_default();
        self.countdown = None;
        self.input.clear();
        self.feedback.clear();
        self.screen = Screen::Setup(SetupForm::new(config));
    }

    // Key dispatch

    pub fn on_up(&mut self) {
        if let Screen::Setup(form) = &mut self.screen {
            form.up();
        }
    }

    pub fn on_down(&mut self) {
        if let Screen::Setup(form) = &mut self.screen {
            form.down();
        }
    }

    pub fn on_left(&mut self) {
        if let Screen::Setup(form) = &mut self.screen {
            form.adjust(-1);
        }
    }

    pub fn on_right(&mut self) {
        if let Screen::Setup(form) = &mut self.screen {
            form.adjust(1);
        }
    }

    pub fn on_insert(&mut self) {
        if let Screen::Setup(form) = &mut self.screen {
            form.add_player();
        }
    }

    pub fn on_delete(&mut self) {
        if let Screen::Setup(form) = &mut self.screen {
            form.remove_player();
        }
    }

    pub fn on_char(&mut self, c: char) {
        self.feedback_alert = false;
        if let Screen::Setup(form) = &mut self.screen {
            form.push_char(c);
            return;
        }
        match self.screen {
            Screen::Playing => self.playing_char(c),
            Screen::Results { .. } if c == 's' || c == 'S' => self.go_to_setup(),
            _ => {}
        }
    }

    pub fn on_backspace(&mut self) {
        self.feedback_alert = false;
        if let Screen::Setup(form) = &mut self.screen {
            form.backspace();
        } else if matches!(self.screen, Screen::Playing) {
            self.playing_backspace();
        }
    }

    pub fn on_enter(&mut self) {
        self.feedback_alert = false;
        match self.screen {
            Screen::Setup(_) => self.setup_confirm(),
            Screen::Playing => self.playing_enter(),
            Screen::Results { .. } => self.rematch(),
            Screen::Error { .. } => self.go_to_setup(),
        }
    }

    pub fn on_tab(&mut self) {
        if !matches!(self.screen, Screen::Playing) || self.game.round_state() != RoundState::Active {
            return;
        }
        self.feedback_alert = false;
        let Some(player) = self.current_player_id() else {
            return;
        };
        match self.game.pass_turn(&player) {
            Ok(_) => {
                self.input.clear();
                self.feedback = format!("{} passed", self.player_name(&player));
                self.after_turn();
            }
            Err(e) => self.report(e),
        }
    }

    /// One-second timer tick.
    pub fn tick(&mut self) {
        if !matches!(self.screen, Screen::Playing) {
            return;
        }
        let elapsed = self.countdown.as_mut().map(Countdown::tick).unwrap_or(false);
        if elapsed {
            self.countdown_elapsed();
        }
    }

    // Setup

    fn setup_confirm(&mut self) {
        let config = match &self.screen {
            Screen::Setup(form) => form.config.clone(),
            _ => return,
        };

        let mut game = GameState::new();
        let started = game
            .configure(config)
            .and_then(|()| game.start_game(&mut self.rng));
        if let Err(e) = started {
            if let Screen::Setup(form) = &mut self.screen {
                form.feedback = e.to_string();
            }
            return;
        }

        self.game = game;
        self.countdown = None;
        self.input.clear();
        self.feedback = self.round_prompt();
        self.screen = Screen::Playing;
        self.autosave();
    }

    // Playing

    fn playing_char(&mut self, c: char) {
        if c == ' ' {
            self.on_space();
            return;
        }
        if self.game.round_state() != RoundState::Active {
            return;
        }
        match self.game.current_round_type() {
            Some(RoundType::Letters) => {
                if c.is_alphabetic() && self.input.chars().count() < MAX_WORD_LEN {
                    self.input.extend(c.to_uppercase());
                }
            }
            Some(RoundType::Numbers) => {
                if let Some(digit) = c.to_digit(10).filter(|d| *d >= 1) {
                    self.pick_token(digit as usize - 1);
                } else if let Some(operator) = Operator::from_key(c) {
                    let result = self.game.select_operator(operator);
                    self.settle(result);
                } else if c == 'r' || c == 'R' {
                    let result = self.game.clear_current_work();
                    if result.is_ok() {
                        self.feedback = "Work cleared".to_string();
                    }
                    self.settle(result);
                }
            }
            None => {}
        }
    }

    /// Space starts the round or cuts the reveal short.
    fn on_space(&mut self) {
        match self.game.round_state() {
            RoundState::Initiated => self.start_round(),
            RoundState::Started => {
                let elapsed = self.countdown.as_mut().map(Countdown::skip).unwrap_or(true);
                if elapsed {
                    self.countdown_elapsed();
                }
            }
            RoundState::Active | RoundState::Completed => {}
        }
    }

    fn start_round(&mut self) {
        match self.game.start_round(&mut self.rng) {
            Ok(()) => {
                self.countdown = self.game.round_secs().map(Countdown::new);
                self.input.clear();
                self.feedback = "Think! Space skips the countdown".to_string();
                self.autosave();
            }
            Err(e) => self.report(e),
        }
    }

    fn countdown_elapsed(&mut self) {
        if self.game.on_countdown_elapsed() {
            self.feedback = self.turn_prompt();
            self.autosave();
        }
    }

    fn playing_enter(&mut self) {
        match self.game.round_state() {
            RoundState::Initiated => self.start_round(),
            RoundState::Started => {}
            RoundState::Active => match self.game.current_round_type() {
                Some(RoundType::Letters) => self.submit_word(),
                Some(RoundType::Numbers) => {
                    let nothing_selected = self
                        .game
                        .workbench()
                        .map(|w| w.selection().is_empty())
                        .unwrap_or(true);
                    if nothing_selected {
                        self.confirm_solution();
                    } else {
                        self.apply_selection();
                    }
                }
                None => {}
            },
            RoundState::Completed => self.advance(),
        }
    }

    fn playing_backspace(&mut self) {
        if self.game.round_state() != RoundState::Active {
            return;
        }
        match self.game.current_round_type() {
            Some(RoundType::Letters) => {
                self.input.pop();
            }
            Some(RoundType::Numbers) => {
                let result = self.game.clear_selection();
                self.settle(result);
            }
            None => {}
        }
    }

    fn submit_word(&mut self) {
        let Some(player) = self.current_player_id() else {
            return;
        };
        match self.game.submit_word(&player, &self.input) {
            Ok(outcome) => {
                self.feedback = match outcome.error() {
                    None => format!("{} +{}", outcome.word, outcome.points),
                    Some(e) => format!("{}: {}", outcome.word, e),
                };
                self.feedback_alert = outcome.error().is_some();
                self.input.clear();
                self.after_turn();
            }
            Err(e) => self.report(e),
        }
    }

    fn pick_token(&mut self, index: usize) {
        let Some(bench) = self.game.workbench() else {
            return;
        };
        let Some(token) = bench.token_at(index) else {
            self.feedback = format!("No number at position {}", index + 1);
            self.feedback_alert = true;
            return;
        };
        let result = if bench.selection().operator.is_none() {
            self.game.select_first(token.id)
        } else {
            self.game.select_second(token.id)
        };
        self.settle(result);
    }

    fn apply_selection(&mut self) {
        match self.game.apply_selection() {
            Ok(applied) => {
                self.feedback = if applied.exact {
                    format!("{}  Target reached! Enter to confirm", applied.record)
                } else {
                    applied.record.to_string()
                };
            }
            Err(e) => self.report(e),
        }
    }

    fn confirm_solution(&mut self) {
        let Some(player) = self.current_player_id() else {
            return;
        };
        match self.game.confirm_solution(&player) {
            Ok(outcome) => {
                self.feedback = format!(
                    "{} reached {}: {} +{}",
                    self.player_name(&player),
                    outcome.result,
                    outcome.band.label(),
                    outcome.points
                );
                self.after_turn();
            }
            Err(e) => self.report(e),
        }
    }

    fn after_turn(&mut self) {
        if self.game.round_state() == RoundState::Completed {
            self.feedback.push_str(". Round complete, Enter to continue");
        } else {
            self.feedback = format!("{}. {}", self.feedback, self.turn_prompt());
        }
        self.autosave();
    }

    fn advance(&mut self) {
        match self.game.advance_round(&mut self.rng) {
            Ok(RoundAdvance::NextRound { .. }) => {
                self.countdown = None;
                self.input.clear();
                self.feedback = self.round_prompt();
                self.autosave();
            }
            Ok(RoundAdvance::GameOver { standings }) => self.finish_game(standings),
            Err(e) => self.report(e),
        }
    }

    fn finish_game(&mut self, standings: Vec<Player>) {
        self.countdown = None;
        let mut games_played = None;
        let mut recent = Vec::new();
        if let (Some(storage), Some(config)) = (&self.storage, self.game.config()) {
            if let Err(e) = storage.record_finished_game(config.rounds, config.game_type, &standings) {
                warn!(error = %e, "could not record finished game");
            }
            if let Err(e) = storage.clear_snapshot() {
                warn!(error = %e, "could not clear snapshot");
            }
            games_played = storage.games_played().ok();
            match storage.recent_games(RECENT_GAMES) {
                Ok(games) => recent = games,
                Err(e) => warn!(error = %e, "could not load game history"),
            }
        }
        self.screen = Screen::Results {
            standings,
            games_played,
            recent,
        };
    }

    /// Same roster and settings, scores back to zero.
    fn rematch(&mut self) {
        match self.game.reset_game(&mut self.rng) {
            Ok(()) => {
                self.input.clear();
                self.feedback = self.round_prompt();
                self.screen = Screen::Playing;
                self.autosave();
            }
            Err(e) => self.report(e),
        }
    }

    // Helpers

    /// Surface a rejected selection step.
    fn settle(&mut self, result: Result<(), GameError>) {
        if let Err(e) = result {
            self.report(e);
        }
    }

    fn report(&mut self, error: GameError) {
        warn!(error = %error, "action rejected");
        if error.needs_setup() {
            self.go_to_setup();
            if let Screen::Setup(form) = &mut self.screen {
                form.feedback = error.to_string();
            }
            return;
        }
        self.feedback = error.to_string();
        self.feedback_alert = true;
    }

    fn autosave(&self) {
        if !matches!(self.screen, Screen::Playing) || self.game.is_finished() {
            return;
        }
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save_snapshot(&self.game) {
                warn!(error = %e, "autosave failed");
            }
        }
    }

    fn current_player_id(&self) -> Option<String> {
        self.game.current_player_id().map(str::to_string)
    }

    fn player_name(&self, id: &str) -> String {
        self.game
            .player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn turn_prompt(&self) -> String {
        match self.game.current_player() {
            Some(player) => format!("{}'s turn", player.name),
            None => String::new(),
        }
    }

    fn round_prompt(&self) -> String {
        let kind = match self.game.current_round_type() {
            Some(RoundType::Letters) => "letters",
            Some(RoundType::Numbers) => "numbers",
            None => return String::new(),
        };
        format!(
            "Round {} of {} ({}). Press Space to start",
            self.game.current_round(),
            self.game.total_rounds(),
            kind
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameType;
    use rand::SeedableRng;

    fn coordinator(config: GameConfig) -> AppCoordinator {
        AppCoordinator::new(
            config,
            StdRng::seed_from_u64(5),
            Some(Storage::open_in_memory().unwrap()),
        )
    }

    fn form(app: &AppCoordinator) -> &SetupForm {
        match &app.screen {
            Screen::Setup(form) => form,
            _ => panic!("not on the setup screen"),
        }
    }

    fn quick_config(game_type: GameType, rounds: u32) -> GameConfig {
        GameConfig {
            rounds,
            game_type,
            letters_round_secs: MIN_ROUND_SECS,
            numbers_round_secs: MIN_ROUND_SECS,
            ..GameConfig::default()
        }
    }

    fn pass_everyone(app: &mut AppCoordinator) {
        while app.game.round_state() == RoundState::Active {
            app.on_tab();
        }
    }

    #[test]
    fn test_setup_roster_limits() {
        let mut app = coordinator(GameConfig::default());
        app.on_insert();
        app.on_insert();
        assert_eq!(form(&app).config.players.len(), MAX_PLAYERS);
        app.on_insert();
        assert_eq!(form(&app).config.players.len(), MAX_PLAYERS);
        assert!(!form(&app).feedback.is_empty());

        app.on_delete();
        app.on_delete();
        app.on_delete();
        assert_eq!(form(&app).config.players.len(), MIN_PLAYERS);

        let ids: Vec<_> = form(&app).config.players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_setup_name_editing() {
        let mut app = coordinator(GameConfig::default().with_player_names(["Ana", "Luis"]));
        app.on_backspace();
        app.on_char('i');
        assert_eq!(form(&app).config.players[0].name, "Ani");

        for _ in 0..20 {
            app.on_char('x');
        }
        assert_eq!(form(&app).config.players[0].name.chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn test_setup_adjust_settings() {
        let mut app = coordinator(GameConfig::default());
        // Move to "Rounds"
        app.on_down();
        app.on_down();
        assert_eq!(form(&app).selected_row(), SetupRow::Rounds);
        for _ in 0..20 {
            app.on_right();
        }
        assert_eq!(form(&app).config.rounds, MAX_ROUNDS);

        app.on_down();
        app.on_right();
        assert_eq!(form(&app).config.game_type, GameType::Letters);

        app.on_down();
        for _ in 0..30 {
            app.on_left();
        }
        assert_eq!(form(&app).config.letters_round_secs, MIN_ROUND_SECS);

        app.on_down();
        for _ in 0..30 {
            app.on_right();
        }
        assert_eq!(form(&app).config.numbers_round_secs, MAX_NUMBERS_ROUND_SECS);

        app.on_down();
        assert_eq!(form(&app).selected_row(), SetupRow::NumbersSecs);
    }

    #[test]
    fn test_setup_rejects_blank_name() {
        let mut app = coordinator(GameConfig::default().with_player_names(["A", "B"]));
        app.on_backspace();
        app.on_enter();
        assert!(!form(&app).feedback.is_empty());
        assert!(!app.game.is_configured());
    }

    #[test]
    fn test_full_letters_game() {
        let mut app = coordinator(quick_config(GameType::Letters, 1));
        app.on_enter();
        assert!(matches!(app.screen, Screen::Playing));
        assert_eq!(app.game.round_state(), RoundState::Initiated);

        app.on_char(' ');
        assert_eq!(app.game.round_state(), RoundState::Started);
        // Typing is locked during the reveal
        app.on_char('a');
        assert!(app.input.is_empty());

        for _ in 0..MIN_ROUND_SECS {
            app.tick();
        }
        assert_eq!(app.game.round_state(), RoundState::Active);

        app.on_char('z');
        app.on_char('q');
        assert_eq!(app.input, "ZQ");
        app.on_backspace();
        assert_eq!(app.input, "Z");
        app.on_enter();
        assert!(app.input.is_empty());
        assert_eq!(app.game.submissions().len(), 1);

        pass_everyone(&mut app);
        assert_eq!(app.game.round_state(), RoundState::Completed);

        app.on_enter();
        match &app.screen {
            Screen::Results {
                standings,
                games_played,
                recent,
            } => {
                assert_eq!(standings.len(), 2);
                assert_eq!(*games_played, Some(1));
                assert_eq!(recent.len(), 1);
                assert_eq!(recent[0].standings, *standings);
            }
            _ => panic!("expected results"),
        }
        let storage = app.storage.as_ref().unwrap();
        assert!(storage.load_snapshot().unwrap().is_none());
    }

    #[test]
    fn test_numbers_keys() {
        let mut app = coordinator(quick_config(GameType::Numbers, 2));
        app.on_enter();
        app.on_char(' ');
        app.on_char(' ');
        assert_eq!(app.game.round_state(), RoundState::Active);

        // Enter with no work yet is rejected
        app.on_enter();
        assert!(!app.feedback.is_empty());
        assert_eq!(app.game.submissions().len(), 0);

        app.on_char('1');
        app.on_char('+');
        app.on_char('2');
        let bench = app.game.workbench().unwrap();
        assert!(bench.selection().second.is_some());

        app.on_enter();
        let bench = app.game.workbench().unwrap();
        assert_eq!(bench.log().len(), 1);
        assert_eq!(bench.tokens().len(), 5);

        app.on_char('1');
        app.on_backspace();
        assert!(app.game.workbench().unwrap().selection().is_empty());

        app.on_char('r');
        assert_eq!(app.game.workbench().unwrap().tokens().len(), 6);

        app.on_char('1');
        app.on_char('*');
        app.on_char('2');
        app.on_enter();
        app.on_enter();
        assert_eq!(app.game.submissions().len(), 1);
    }

    #[test]
    fn test_rematch_and_back_to_setup() {
        let mut app = coordinator(quick_config(GameType::Letters, 1));
        app.on_enter();
        app.on_char(' ');
        app.on_char(' ');
        pass_everyone(&mut app);
        app.on_enter();
        assert!(matches!(app.screen, Screen::Results { .. }));

        app.on_enter();
        assert!(matches!(app.screen, Screen::Playing));
        assert_eq!(app.game.current_round(), 1);
        assert!(!app.game.is_finished());

        app.on_char(' ');
        app.on_char(' ');
        pass_everyone(&mut app);
        app.on_enter();
        app.on_char('s');
        assert_eq!(form(&app).config.rounds, 1);
    }

    #[test]
    fn test_quit_saves_and_resume_restores() {
        let mut app = coordinator(quick_config(GameType::Mixed, 3));
        app.on_enter();
        app.on_char(' ');
        app.quit();
        assert!(app.should_quit);

        let saved = app.game.clone();
        let storage = app.storage.take();
        let mut resumed = AppCoordinator::new(GameConfig::default(), StdRng::seed_from_u64(1), storage);
        assert!(resumed.resume_saved());
        assert!(matches!(resumed.screen, Screen::Playing));
        assert_eq!(resumed.game, saved);
        assert_eq!(resumed.countdown.as_ref().map(Countdown::remaining), Some(MIN_ROUND_SECS));
    }

    #[test]
    fn test_nothing_to_resume() {
        let mut app = coordinator(GameConfig::default());
        assert!(!app.resume_saved());
        assert!(matches!(app.screen, Screen::Setup(_)));

        let mut no_storage = AppCoordinator::new(GameConfig::default(), StdRng::seed_from_u64(1), None);
        assert!(!no_storage.resume_saved());
    }

    #[test]
    fn test_discard_saved() {
        let mut app = coordinator(quick_config(GameType::Letters, 2));
        app.on_enter();
        app.discard_saved();
        assert!(!app.resume_saved());
    }
}
