//! Persistence of the league document, and the persisted mutations built on it.
//!
//! Every mutation loads the whole document, validates and applies the change,
//! saves the whole document back, and only then returns success.

use crate::models::{GameResult, LeagueData, LeagueError, PlayerName};
use chrono::Utc;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Where the league document lives.
pub trait Store {
    /// Read the document. A store that has never been written loads as an empty league.
    fn load(&self) -> Result<LeagueData, LeagueError>;

    /// Overwrite the whole document.
    fn save(&self, data: &LeagueData) -> Result<(), LeagueError>;
}

/// League document stored as pretty-printed JSON in a single file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<LeagueData, LeagueError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No data file at {}, starting empty", self.path.display());
                return Ok(LeagueData::new());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, data: &LeagueData) -> Result<(), LeagueError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // Same 4-space layout the data file has always had.
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(data, &mut ser)?;

        let tmp = self.temp_path();
        let written = write_file(&tmp, &buf).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            fs::remove_file(&tmp).ok();
            return Err(e.into());
        }
        Ok(())
    }
}

fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// League document held in memory (tests, embedding).
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<LeagueData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: LeagueData) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<LeagueData, LeagueError> {
        Ok(self.data.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, data: &LeagueData) -> Result<(), LeagueError> {
        *self.data.lock().unwrap_or_else(PoisonError::into_inner) = data.clone();
        Ok(())
    }
}

/// Add a player and persist. Returns the stored (trimmed) name.
pub fn add_player<S: Store + ?Sized>(store: &S, name: &str) -> Result<PlayerName, LeagueError> {
    let mut data = store.load()?;
    let added = data.add_player(name)?.to_string();
    store.save(&data)?;
    log::info!("Player '{}' added ({} players)", added, data.players.len());
    Ok(added)
}

/// Record a game (stamped with the current time) and persist. Returns the stored result.
pub fn record_game<S: Store + ?Sized>(
    store: &S,
    winner: &str,
    loser: &str,
) -> Result<GameResult, LeagueError> {
    let mut data = store.load()?;
    let game = data
        .record_game(GameResult::new(winner, loser).played_at(Utc::now()))?
        .clone();
    store.save(&data)?;
    log::info!(
        "Game recorded: {} beat {} ({} games)",
        game.winner,
        game.loser,
        data.games.len()
    );
    Ok(game)
}
