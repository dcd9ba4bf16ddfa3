//! Player names and the per-player statistics row.

use serde::{Deserialize, Serialize};

/// A player is identified solely by its display name (unique, case-sensitive).
pub type PlayerName = String;

/// One row of the players table: aggregate record of a single player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: PlayerName,
    pub wins: u32,
    pub losses: u32,
    pub total: u32,
    /// Percentage of games won, rounded to one decimal place.
    pub win_rate: f64,
}

impl PlayerStats {
    /// Create an empty row for the given player.
    pub fn new(name: impl Into<PlayerName>) -> Self {
        Self {
            name: name.into(),
            wins: 0,
            losses: 0,
            total: 0,
            win_rate: 0.0,
        }
    }

    /// Record a win for this player.
    pub fn add_win(&mut self) {
        self.wins += 1;
        self.total += 1;
    }

    /// Record a loss for this player.
    pub fn add_loss(&mut self) {
        self.losses += 1;
        self.total += 1;
    }

    /// Recompute `win_rate` from the current counts.
    pub fn refresh_win_rate(&mut self) {
        self.win_rate = percent(self.wins, self.total);
    }
}

/// `100 * part / whole` rounded to one decimal place; 0 when `whole` is 0.
pub fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (1000.0 * part as f64 / whole as f64).round() / 10.0
}
