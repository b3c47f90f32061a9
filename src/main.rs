//! Cifras y Letras - letters and numbers party game for the terminal
//!
//! Pass-and-play for 2-4 players: spell the longest word, get closest to the target.

mod app;
mod config;
mod error;
mod game;
mod storage;
mod tui;

use app::AppCoordinator;
use clap::Parser;
use config::{GameConfig, GameType};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use storage::Storage;
use tracing::{info, warn, Level};
use tui::Tui;

const LOG_FILE: &str = "cifras.log";

#[derive(Parser, Debug)]
#[command(version, about = "Letters and numbers party game for the terminal", long_about = None)]
struct Cli {
    /// player name, once per seat (2-4 players)
    #[arg(short, long = "player", value_name = "NAME")]
    players: Vec<String>,

    /// number of rounds
    #[arg(short, long)]
    rounds: Option<u32>,

    /// which rounds to play
    #[arg(short = 't', long, value_enum)]
    game_type: Option<GameType>,

    /// seconds of thinking time in letters rounds
    #[arg(long)]
    letters_secs: Option<u32>,

    /// seconds of thinking time in numbers rounds
    #[arg(long)]
    numbers_secs: Option<u32>,

    /// seed for reproducible pools and turn order
    #[arg(long)]
    seed: Option<u64>,

    /// database file instead of the default data directory
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// ignore and discard any saved game
    #[arg(long)]
    fresh: bool,

    /// debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Defaults overridden by whatever was given on the command line.
    fn game_config(&self) -> GameConfig {
        let mut config = GameConfig::default();
        if !self.players.is_empty() {
            config = config.with_player_names(self.players.iter().cloned());
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(game_type) = self.game_type {
            config.game_type = game_type;
        }
        if let Some(secs) = self.letters_secs {
            config.letters_round_secs = secs;
        }
        if let Some(secs) = self.numbers_secs {
            config.numbers_round_secs = secs;
        }
        config
    }
}

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let Ok(dir) = Storage::data_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    else {
        return;
    };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
}

fn open_storage(path: Option<PathBuf>) -> Option<Storage> {
    let opened = match path {
        Some(path) => Storage::open_at(path),
        None => Storage::open(),
    };
    match opened {
        Ok(storage) => Some(storage),
        Err(e) => {
            warn!(error = %e, "storage unavailable, playing without saves");
            None
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.game_config();
    if let Err(e) = config.validate() {
        eprintln!("cifras: {}", e);
        std::process::exit(2);
    }

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    info!(seed = ?cli.seed, "starting");

    let mut coordinator = AppCoordinator::new(config, rng, open_storage(cli.db.clone()));
    if cli.fresh {
        coordinator.discard_saved();
    } else {
        coordinator.resume_saved();
    }

    let mut terminal = Tui::new()?;
    terminal.enter()?;

    // Main event loop
    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| tui::render(frame, &coordinator))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => coordinator.quit(),
                        KeyCode::Enter => coordinator.on_enter(),
                        KeyCode::Backspace => coordinator.on_backspace(),
                        KeyCode::Tab => coordinator.on_tab(),
                        KeyCode::Up => coordinator.on_up(),
                        KeyCode::Down => coordinator.on_down(),
                        KeyCode::Left => coordinator.on_left(),
                        KeyCode::Right => coordinator.on_right(),
                        KeyCode::Insert => coordinator.on_insert(),
                        KeyCode::Delete => coordinator.on_delete(),
                        KeyCode::Char(c) => coordinator.on_char(c),
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            coordinator.tick();
            last_tick = Instant::now();
        }

        if coordinator.should_quit {
            break;
        }
    }

    info!("exiting");
    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}
