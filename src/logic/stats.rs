//! Aggregates over the game log: general summary, players table, head-to-head.
//!
//! All functions are single linear passes over `games` with no side effects.
//! Ties are always broken by ascending player name.

use crate::models::{percent, GameResult, LeagueError, PlayerName, PlayerStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headline numbers for the whole league.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneralSummary {
    pub total_games: usize,
    /// Player with the most wins (ties: ascending name).
    pub top_player: PlayerName,
    pub top_player_wins: u32,
    /// Top player's wins as a percentage of all games played.
    pub top_player_share: f64,
    /// First row of the players table.
    pub best_win_rate: PlayerStats,
}

/// Outcome of all games between two players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub p1: PlayerName,
    pub p2: PlayerName,
    pub p1_wins: u32,
    pub p2_wins: u32,
    pub total: u32,
}

impl HeadToHead {
    /// True if the two players never met.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Win percentages of (p1, p2), one decimal place; `None` when they never met.
    pub fn win_rates(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        Some((percent(self.p1_wins, self.total), percent(self.p2_wins, self.total)))
    }
}

/// Wins and losses for every player who appears in `games`, keyed by name.
fn tally(games: &[GameResult]) -> BTreeMap<&str, PlayerStats> {
    let mut rows: BTreeMap<&str, PlayerStats> = BTreeMap::new();
    for game in games {
        rows.entry(game.winner.as_str())
            .or_insert_with(|| PlayerStats::new(game.winner.as_str()))
            .add_win();
        rows.entry(game.loser.as_str())
            .or_insert_with(|| PlayerStats::new(game.loser.as_str()))
            .add_loss();
    }
    rows
}

/// Total games, the player with most wins, and the best win rate.
///
/// Every player who played is considered, including those with zero wins.
/// Returns `NoGames` when the log is empty.
pub fn general_summary(games: &[GameResult]) -> Result<GeneralSummary, LeagueError> {
    let table = all_players_table(games);
    let best_win_rate = table.first().cloned().ok_or(LeagueError::NoGames)?;

    // Strictly-greater keeps the first maximum, and `tally` iterates by ascending name.
    let by_name = tally(games);
    let mut top: Option<&PlayerStats> = None;
    for row in by_name.values() {
        if top.map_or(true, |t| row.wins > t.wins) {
            top = Some(row);
        }
    }
    let top = top.ok_or(LeagueError::NoGames)?;

    Ok(GeneralSummary {
        total_games: games.len(),
        top_player: top.name.clone(),
        top_player_wins: top.wins,
        top_player_share: percent(top.wins, games.len() as u32),
        best_win_rate,
    })
}

/// Per-player wins, losses and win rate for everyone who has played.
///
/// Sorted by win rate (desc), then wins (desc), then name (asc).
/// Registered players with no games are not listed.
pub fn all_players_table(games: &[GameResult]) -> Vec<PlayerStats> {
    let mut rows: Vec<PlayerStats> = tally(games)
        .into_values()
        .map(|mut row| {
            row.refresh_win_rate();
            row
        })
        .collect();
    rows.sort_by(|a, b| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then_with(|| b.wins.cmp(&a.wins))
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

/// Count the games `p1` won against `p2` and vice versa.
pub fn head_to_head(games: &[GameResult], p1: &str, p2: &str) -> HeadToHead {
    let mut p1_wins = 0;
    let mut p2_wins = 0;
    for game in games.iter().filter(|g| g.is_between(p1, p2)) {
        if game.winner == p1 {
            p1_wins += 1;
        } else {
            p2_wins += 1;
        }
    }
    HeadToHead {
        p1: p1.to_string(),
        p2: p2.to_string(),
        p1_wins,
        p2_wins,
        total: p1_wins + p2_wins,
    }
}

/// Every unordered pair of distinct players as `(a, b)` with `a < b`, in name order.
pub fn head_to_head_pairs(players: &[PlayerName]) -> Vec<(PlayerName, PlayerName)> {
    let mut sorted: Vec<&PlayerName> = players.iter().collect();
    sorted.sort();
    sorted.dedup();
    let mut pairs = Vec::new();
    for (i, a) in sorted.iter().enumerate() {
        for b in &sorted[i + 1..] {
            pairs.push(((*a).clone(), (*b).clone()));
        }
    }
    pairs
}
