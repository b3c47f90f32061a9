#![allow(dead_code)]
//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - A single snapshot slot for the game in progress
//! - A history of finished games

use crate::app::GameState;
use crate::config::{GameType, Player};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Current schema version. Bump this when making schema changes.
const SCHEMA_VERSION: u32 = 1;

const DB_FILE: &str = "cifras.db";

/// Key of the only snapshot row.
const CURRENT_SLOT: &str = "current";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("could not determine data directory")]
    NoDataDirectory,

    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },

    #[error("failed to create data directory: {0}")]
    CreateDirFailed(#[source] std::io::Error),

    #[error("malformed stored data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A finished game as kept in the history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub id: i64,
    pub rounds: u32,
    pub game_type: GameType,
    /// Final standings, winner first
    pub standings: Vec<Player>,
    /// Unix timestamp (milliseconds)
    pub finished_at: i64,
}

impl GameRecord {
    pub fn winner(&self) -> Option<&Player> {
        self.standings.first()
    }
}

/// The main storage handle.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the database in the OS data directory.
    ///
    /// - Linux: `$XDG_DATA_HOME/cifras/` or `~/.local/share/cifras/`
    /// - macOS: `~/Library/Application Support/cifras/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;
        Self::open_at(data_dir.join(DB_FILE))
    }

    /// Open or create a database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(StorageError::CreateDirFailed)?;
        }
        let conn = Connection::open(path)?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        info!(path = %path.display(), "storage opened");
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "cifras")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    // === Snapshot ===

    /// Replace the stored snapshot with `state`.
    pub fn save_snapshot(&self, state: &GameState) -> Result<(), StorageError> {
        let payload = state.to_snapshot()?;
        self.conn.execute(
            "INSERT INTO snapshots (slot, payload, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(slot) DO UPDATE SET payload = excluded.payload, saved_at = excluded.saved_at",
            params![CURRENT_SLOT, payload, now_millis()],
        )?;
        debug!(bytes = payload.len(), "snapshot saved");
        Ok(())
    }

    /// The stored snapshot, if there is one.
    pub fn load_snapshot(&self) -> Result<Option<GameState>, StorageError> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE slot = ?1",
                params![CURRENT_SLOT],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(json) => Ok(Some(GameState::from_snapshot(&json)?)),
            None => Ok(None),
        }
    }

    pub fn clear_snapshot(&self) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM snapshots WHERE slot = ?1", params![CURRENT_SLOT])?;
        debug!("snapshot cleared");
        Ok(())
    }

    // === History ===

    /// Append a finished game. Returns its row id.
    pub fn record_finished_game(
        &self,
        rounds: u32,
        game_type: GameType,
        standings: &[Player],
    ) -> Result<i64, StorageError> {
        let standings_json = serde_json::to_string(standings)?;
        let game_type_json = serde_json::to_string(&game_type)?;
        self.conn.execute(
            "INSERT INTO games (rounds, game_type, standings, finished_at) VALUES (?1, ?2, ?3, ?4)",
            params![rounds, game_type_json, standings_json, now_millis()],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, rounds, "finished game recorded");
        Ok(id)
    }

    /// Most recent games first.
    pub fn recent_games(&self, limit: usize) -> Result<Vec<GameRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, rounds, game_type, standings, finished_at FROM games
             ORDER BY finished_at DESC, id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut games = Vec::new();
        for row in rows {
            let (id, rounds, game_type, standings, finished_at) = row?;
            games.push(GameRecord {
                id,
                rounds,
                game_type: serde_json::from_str(&game_type)?,
                standings: serde_json::from_str(&standings)?,
                finished_at,
            });
        }
        Ok(games)
    }

    pub fn games_played(&self) -> Result<i64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
        Ok(count)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Game in progress, serialized state
            CREATE TABLE snapshots (
                slot TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                saved_at INTEGER NOT NULL
            );

            CREATE TABLE games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                rounds INTEGER NOT NULL,
                game_type TEXT NOT NULL,
                standings TEXT NOT NULL,
                finished_at INTEGER NOT NULL
            );

            CREATE INDEX idx_games_finished ON games (finished_at);
            "#,
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
