//! Data structures for the pool league: players, games, the league document.

mod game;
mod league;
mod player;

pub use game::GameResult;
pub use league::{LeagueData, LeagueError, MIN_PLAYERS_FOR_GAME};
pub use player::{percent, PlayerName, PlayerStats};
