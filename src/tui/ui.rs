//! UI rendering using ratatui
//!
//! Supports multiple screens:
//! - Setup: roster and game settings
//! - Playing: round header, per-phase play area, scoreboard
//! - Results: final standings and recent games
//! - Error: error message display

use crate::app::{AppCoordinator, GameState, RoundContent, RoundState, Screen, SetupForm, Submission};
use crate::config::Player;
use crate::game::arithmetic::{ArithmeticEngine, TokenId};
use crate::storage::GameRecord;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
};

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    match &coordinator.screen {
        Screen::Setup(form) => render_setup(frame, form),
        Screen::Playing => render_game(frame, coordinator),
        Screen::Results {
            standings,
            games_played,
            recent,
        } => render_results(frame, standings, *games_played, recent),
        Screen::Error { message } => render_error(frame, message),
    }
}

/// Render the setup form
fn render_setup(frame: &mut Frame, form: &SetupForm) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Logo
            Constraint::Min(8),    // Form rows
            Constraint::Length(1), // Feedback
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
  ___ ___ ___ ___    _   ___
 / __|_ _| __| _ \  /_\ / __|
| (__ | || _||   / / _ \\__ \
 \___|___|_| |_|_\/_/ \_\___/
        y   L E T R A S
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    let items: Vec<ListItem> = form
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let selected = i == form.selected;
            let style = if selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if selected { "> " } else { "  " };
            ListItem::new(format!("{}{:<14}{}", prefix, row.label(), form.value(row))).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("New game"),
    );
    frame.render_widget(list, layout[1]);

    let feedback = Paragraph::new(form.feedback.as_str())
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center);
    frame.render_widget(feedback, layout[2]);

    let footer = Paragraph::new(
        "↑↓ Field  ←→ Adjust  Type Name  Ins/Del Player  Enter Start  Esc Quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(footer, layout[3]);
}

/// Render the in-game screen
fn render_game(frame: &mut Frame, coordinator: &AppCoordinator) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with round, pool, timer
            Constraint::Min(0),    // Main content area
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, layout[0], coordinator);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(30),    // Play area
            Constraint::Length(24), // Scoreboard
        ])
        .split(layout[1]);

    let game = &coordinator.game;
    match game.round_state() {
        RoundState::Initiated => render_waiting(frame, columns[0], coordinator),
        RoundState::Started => render_reveal(frame, columns[0], coordinator),
        RoundState::Active => render_turn(frame, columns[0], coordinator),
        RoundState::Completed => render_round_summary(frame, columns[0], game),
    }
    render_scoreboard(frame, columns[1], game);

    let footer = Paragraph::new(footer_hint(coordinator))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

/// Render the header: round, pool or target, timer
fn render_header(frame: &mut Frame, area: Rect, coordinator: &AppCoordinator) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22), // Round
            Constraint::Min(20),    // Pool
            Constraint::Length(10), // Timer
        ])
        .split(inner);

    let game = &coordinator.game;
    let kind = game
        .current_round_type()
        .map(|t| t.to_string())
        .unwrap_or_default();
    let round = Paragraph::new(format!(
        "Round {}/{} {}",
        game.current_round(),
        game.total_rounds(),
        kind
    ))
    .style(Style::default().fg(Color::Yellow).bold())
    .alignment(Alignment::Left);
    frame.render_widget(round, header_layout[0]);

    let pool = Paragraph::new(format_pool(game))
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(pool, header_layout[1]);

    if let Some(countdown) = coordinator.countdown.as_ref().filter(|c| c.is_running()) {
        let remaining = countdown.remaining();
        let color = if remaining <= 10 {
            Color::Red
        } else if remaining <= 30 {
            Color::Yellow
        } else {
            Color::Green
        };
        let timer = Paragraph::new(format_timer(remaining))
            .style(Style::default().fg(color).bold())
            .alignment(Alignment::Right);
        frame.render_widget(timer, header_layout[2]);
    }
}

/// Between rounds: who is up and how to begin
fn render_waiting(frame: &mut Frame, area: Rect, coordinator: &AppCoordinator) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    let title = Paragraph::new(coordinator.feedback.as_str())
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, layout[1]);

    let order: Vec<String> = coordinator
        .game
        .turn_order()
        .iter()
        .filter_map(|id| coordinator.game.player(id))
        .map(|p| p.name.clone())
        .collect();
    let order = Paragraph::new(format!("Turn order: {}", order.join(", ")))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(order, layout[2]);
}

/// Reveal phase: content visible, input locked
fn render_reveal(frame: &mut Frame, area: Rect, coordinator: &AppCoordinator) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(3), // Pool
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Hint
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let pool = Paragraph::new(format_pool(&coordinator.game))
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(pool, layout[1]);

    if let Some(countdown) = &coordinator.countdown {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Yellow))
            .ratio(countdown.ratio())
            .label(format_timer(countdown.remaining()));
        frame.render_widget(gauge, layout[3]);
    }

    let hint = Paragraph::new(coordinator.feedback.as_str())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint, layout[5]);
}

/// Active phase: the current player's input
fn render_turn(frame: &mut Frame, area: Rect, coordinator: &AppCoordinator) {
    let game = &coordinator.game;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Player
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Input or numbers
            Constraint::Length(1), // Selection
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Feedback
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Operation log
        ])
        .split(area);

    let name = game
        .current_player()
        .map(|p| p.name.as_str())
        .unwrap_or("?");
    let player = Paragraph::new(format!("{}'s turn", name))
        .style(Style::default().fg(Color::Magenta).bold());
    frame.render_widget(player, layout[0]);

    match game.workbench() {
        Some(bench) => {
            let tokens = Paragraph::new(format_tokens(bench))
                .style(Style::default().fg(Color::Cyan).bold());
            frame.render_widget(tokens, layout[2]);

            let selection = Paragraph::new(format_selection(bench))
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(selection, layout[3]);

            let items: Vec<ListItem> = bench
                .log()
                .iter()
                .map(|record| ListItem::new(record.to_string()))
                .collect();
            let log = List::new(items).block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title("Operations"),
            );
            frame.render_widget(log, layout[7]);
        }
        None => {
            let input = Paragraph::new(format!("> {}_", coordinator.input))
                .style(Style::default().fg(Color::White));
            frame.render_widget(input, layout[2]);
        }
    }

    let color = if coordinator.feedback_alert {
        Color::Red
    } else {
        Color::Green
    };
    let feedback = Paragraph::new(coordinator.feedback.as_str()).style(Style::default().fg(color));
    frame.render_widget(feedback, layout[5]);
}

/// Completed phase: what everyone handed in
fn render_round_summary(frame: &mut Frame, area: Rect, game: &GameState) {
    let items: Vec<ListItem> = game
        .turn_order()
        .iter()
        .filter_map(|id| game.player(id))
        .map(|player| {
            let line = match game.submission(&player.id) {
                Some(Submission::Word { word, valid, points }) => {
                    let verdict = if *valid { "" } else { " (rejected)" };
                    format!("{}: {}{} +{}", player.name, word, verdict, points)
                }
                Some(Submission::Solution {
                    trace,
                    result,
                    band,
                    points,
                }) => format!(
                    "{}: {} [{}] {} +{}",
                    player.name,
                    result,
                    band.label(),
                    trace,
                    points
                ),
                Some(Submission::Passed) => format!("{}: passed +0", player.name),
                None => format!("{}: -", player.name),
            };
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Round complete, Enter to continue"),
    );
    frame.render_widget(list, area);
}

/// Render the live scoreboard (right panel)
fn render_scoreboard(frame: &mut Frame, area: Rect, game: &GameState) {
    let current = game.current_player_id();
    let items: Vec<ListItem> = game
        .standings()
        .iter()
        .map(|player| {
            let marker = if current == Some(player.id.as_str()) { "▶" } else { " " };
            let round = game
                .round_score(&player.id)
                .map(|p| format!(" (+{})", p))
                .unwrap_or_default();
            let style = if current == Some(player.id.as_str()) {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{} {} {}{}", marker, player.name, player.score, round))
                .style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Scoreboard"),
    );
    frame.render_widget(list, area);
}

/// Render final standings
fn render_results(
    frame: &mut Frame,
    standings: &[Player],
    games_played: Option<i64>,
    recent: &[GameRecord],
) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(1), // Winner
            Constraint::Length(1), // Spacer
            Constraint::Min(4),    // Standings
            Constraint::Length(recent_height(recent)), // Recent games
            Constraint::Length(1), // Games played
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let title = Paragraph::new("GAME OVER")
        .style(Style::default().fg(Color::Red).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    let winner = Paragraph::new(format_winner(standings))
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(winner, layout[1]);

    let items: Vec<ListItem> = standings
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let prefix = match i {
                0 => "🥇",
                1 => "🥈",
                2 => "🥉",
                _ => "  ",
            };
            ListItem::new(format!("{} {} - {}", prefix, player.name, player.score))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Final standings"),
    );
    frame.render_widget(list, layout[3]);

    if !recent.is_empty() {
        let items: Vec<ListItem> = recent
            .iter()
            .map(|record| ListItem::new(format_record(record)))
            .collect();
        let list = List::new(items)
            .style(Style::default().fg(Color::Gray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title("Recent games"),
            );
        frame.render_widget(list, layout[4]);
    }

    if let Some(count) = games_played {
        let played = Paragraph::new(format!("Games played on this machine: {}", count))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(played, layout[5]);
    }

    let footer = Paragraph::new("Enter Rematch  S Setup  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[6]);
}

/// Bordered list height, zero when there is no history.
fn recent_height(recent: &[GameRecord]) -> u16 {
    if recent.is_empty() {
        0
    } else {
        recent.len() as u16 + 2
    }
}

/// One history line: "Ana 14 · Mixed, 3 rounds"
fn format_record(record: &GameRecord) -> String {
    let rounds = if record.rounds == 1 { "round" } else { "rounds" };
    let winner = record
        .winner()
        .map(|p| format!("{} {}", p.name, p.score))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} · {}, {} {}",
        winner,
        record.game_type.label(),
        record.rounds,
        rounds
    )
}

/// Render error screen
fn render_error(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Percentage(40),
        ])
        .margin(2)
        .split(area);

    let error = Paragraph::new(format!("Error: {}", message))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center);
    frame.render_widget(error, layout[1]);

    let hint = Paragraph::new("Press Enter to continue")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint, layout[2]);
}

fn footer_hint(coordinator: &AppCoordinator) -> &'static str {
    let game = &coordinator.game;
    match game.round_state() {
        RoundState::Initiated => "Space Start round  Esc Save & quit",
        RoundState::Started => "Space Skip countdown  Esc Save & quit",
        RoundState::Active if game.workbench().is_some() => {
            "1-9 Number  + - * / Operator  Enter Apply/Confirm  ⌫ Clear  R Reset  Tab Pass"
        }
        RoundState::Active => "Type word  Enter Submit  Tab Pass  Esc Save & quit",
        RoundState::Completed => "Enter Continue  Esc Save & quit",
    }
}

/// Letters or target for the header
fn format_pool(game: &GameState) -> String {
    match game.round().map(|r| &r.content) {
        Some(RoundContent::Letters { letters }) => format_letter_rack(letters),
        Some(RoundContent::Numbers { numbers, target }) => {
            let numbers: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
            format!("Target {}  [ {} ]", target, numbers.join(" "))
        }
        None => String::new(),
    }
}

/// Format the letter rack for display
fn format_letter_rack(letters: &[char]) -> String {
    let letters_str: String = letters
        .iter()
        .map(|c| c.to_ascii_uppercase().to_string())
        .collect::<Vec<_>>()
        .join(" ");

    format!("[ {} ]", letters_str)
}

/// Available numbers with their key positions; selected ones bracketed
fn format_tokens(bench: &ArithmeticEngine) -> String {
    let selection = bench.selection();
    bench
        .tokens()
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let picked = selection.first == Some(token.id) || selection.second == Some(token.id);
            if picked {
                format!("{}:<{}>", i + 1, token.value)
            } else {
                format!("{}:{}", i + 1, token.value)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// The operation being built, e.g. "75 × _"
fn format_selection(bench: &ArithmeticEngine) -> String {
    let selection = bench.selection();
    if selection.is_empty() {
        return match bench.final_result() {
            Some(result) => format!("Current result: {}", result),
            None => String::new(),
        };
    }
    let value = |id: Option<TokenId>| {
        bench
            .tokens()
            .iter()
            .find(|t| Some(t.id) == id)
            .map(|t| t.value.to_string())
            .unwrap_or_else(|| "_".to_string())
    };
    let operator = selection
        .operator
        .map(|op| op.symbol().to_string())
        .unwrap_or_else(|| "_".to_string());
    format!("{} {} {}", value(selection.first), operator, value(selection.second))
}

fn format_winner(standings: &[Player]) -> String {
    match standings {
        [] => String::new(),
        [first, second, ..] if first.score == second.score => {
            format!("Tie at {} points", first.score)
        }
        [first, ..] => format!("{} wins with {} points", first.name, first.score),
    }
}

/// Format the timer display
fn format_timer(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}
