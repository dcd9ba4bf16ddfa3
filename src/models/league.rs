//! League document (players + games) and LeagueError.

use crate::models::game::GameResult;
use crate::models::player::PlayerName;
use serde::{Deserialize, Serialize};
use std::{error, fmt, io};

/// Minimum number of players before a game can be recorded.
pub const MIN_PLAYERS_FOR_GAME: usize = 2;

/// Errors that can occur during league operations.
#[derive(Debug)]
pub enum LeagueError {
    /// Player name is empty after trimming.
    EmptyName,
    /// A player with this exact name already exists.
    DuplicatePlayer(PlayerName),
    /// Named player is not in the league.
    UnknownPlayer(PlayerName),
    /// Winner and loser are the same player.
    SamePlayer,
    /// Not enough players to record a game.
    NotEnoughPlayers { required: usize, found: usize },
    /// No games recorded yet, so there is nothing to summarize.
    NoGames,
    /// Reading or writing the data file failed.
    Io(io::Error),
    /// The data file is not a valid league document.
    Serde(serde_json::Error),
    /// Writing the CSV export failed.
    Csv(csv::Error),
}

impl LeagueError {
    /// True for failures of the storage medium rather than rejected input.
    pub fn is_storage(&self) -> bool {
        matches!(self, LeagueError::Io(_) | LeagueError::Serde(_) | LeagueError::Csv(_))
    }
}

impl fmt::Display for LeagueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeagueError::EmptyName => write!(f, "Player name must not be empty"),
            LeagueError::DuplicatePlayer(name) => write!(f, "Player '{}' already exists", name),
            LeagueError::UnknownPlayer(name) => write!(f, "Player '{}' does not exist", name),
            LeagueError::SamePlayer => write!(f, "Winner and loser must be different"),
            LeagueError::NotEnoughPlayers { required, found } => write!(
                f,
                "Need at least {} players to record a game (have {})",
                required, found
            ),
            LeagueError::NoGames => write!(f, "No games played yet"),
            LeagueError::Io(e) => write!(f, "I/O error: {}", e),
            LeagueError::Serde(e) => write!(f, "Invalid league data: {}", e),
            LeagueError::Csv(e) => write!(f, "CSV error: {}", e),
        }
    }
}

impl error::Error for LeagueError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            LeagueError::Io(e) => Some(e),
            LeagueError::Serde(e) => Some(e),
            LeagueError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LeagueError {
    fn from(err: io::Error) -> LeagueError {
        LeagueError::Io(err)
    }
}

impl From<serde_json::Error> for LeagueError {
    fn from(err: serde_json::Error) -> LeagueError {
        LeagueError::Serde(err)
    }
}

impl From<csv::Error> for LeagueError {
    fn from(err: csv::Error) -> LeagueError {
        LeagueError::Csv(err)
    }
}

/// The persisted league document: every player and every recorded game, in order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeagueData {
    #[serde(default)]
    pub players: Vec<PlayerName>,
    #[serde(default)]
    pub games: Vec<GameResult>,
}

impl LeagueData {
    /// Create an empty league.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a league with the given players and no games.
    pub fn with_players<I, S>(players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PlayerName>,
    {
        Self {
            players: players.into_iter().map(Into::into).collect(),
            games: Vec::new(),
        }
    }

    /// Exact, case-sensitive membership check.
    pub fn has_player(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }

    /// Whether enough players exist to record a game.
    pub fn can_record_games(&self) -> bool {
        self.players.len() >= MIN_PLAYERS_FOR_GAME
    }

    /// Fail with `NotEnoughPlayers` unless a game can be recorded.
    pub fn ensure_can_record_games(&self) -> Result<(), LeagueError> {
        if self.can_record_games() {
            Ok(())
        } else {
            Err(LeagueError::NotEnoughPlayers {
                required: MIN_PLAYERS_FOR_GAME,
                found: self.players.len(),
            })
        }
    }

    /// Add a player. The name is trimmed; it must be non-empty and not already present.
    /// Returns the name as stored.
    pub fn add_player(&mut self, name: &str) -> Result<&str, LeagueError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::EmptyName);
        }
        if self.has_player(name) {
            return Err(LeagueError::DuplicatePlayer(name.to_string()));
        }
        self.players.push(name.to_string());
        Ok(self.players.last().map(String::as_str).unwrap_or_default())
    }

    /// Append a game result. Both players must exist and differ; the winner is checked first.
    pub fn record_game(&mut self, game: GameResult) -> Result<&GameResult, LeagueError> {
        if game.winner == game.loser {
            return Err(LeagueError::SamePlayer);
        }
        for name in [&game.winner, &game.loser] {
            if !self.has_player(name) {
                return Err(LeagueError::UnknownPlayer(name.clone()));
            }
        }
        self.games.push(game);
        Ok(&self.games[self.games.len() - 1])
    }

    /// Fail with `UnknownPlayer` for the first of `names` not in the league.
    pub fn ensure_players(&self, names: &[&str]) -> Result<(), LeagueError> {
        match names.iter().find(|n| !self.has_player(n)) {
            Some(missing) => Err(LeagueError::UnknownPlayer(missing.to_string())),
            None => Ok(()),
        }
    }
}
