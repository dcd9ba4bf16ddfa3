//! A recorded game: ordered (winner, loser) pair.

use crate::models::player::PlayerName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One game outcome. Immutable once appended to the league.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: PlayerName,
    pub loser: PlayerName,
    /// When the result was recorded. Absent in documents written before timestamps existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played_at: Option<DateTime<Utc>>,
}

impl GameResult {
    pub fn new(winner: impl Into<PlayerName>, loser: impl Into<PlayerName>) -> Self {
        Self {
            winner: winner.into(),
            loser: loser.into(),
            played_at: None,
        }
    }

    /// Same result, stamped with the given time.
    pub fn played_at(mut self, at: DateTime<Utc>) -> Self {
        self.played_at = Some(at);
        self
    }

    /// True if this game was played between `a` and `b`, in either order.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.winner == a && self.loser == b) || (self.winner == b && self.loser == a)
    }
}
