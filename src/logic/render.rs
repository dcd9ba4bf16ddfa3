//! Reply text, menus and CSV export.

use crate::logic::conversation::{Intent, Message, ReplyOption};
use crate::logic::stats::{GeneralSummary, HeadToHead};
use crate::models::{LeagueError, PlayerName, PlayerStats};

pub const WELCOME: &str = "Welcome to Pool Match Tracker! Choose an option:";
pub const ASK_PLAYER_NAME: &str = "Send the name of the new player.";
pub const ASK_WINNER: &str = "Send the winner's name.";
pub const ASK_LOSER: &str = "Now send the loser's name.";
pub const IDLE_HINT: &str = "Pick an option from the menu first.";
pub const HEAD_TO_HEAD_TITLE: &str = "🎯 *Head-to-Head Stats*";

/// Main menu with the four primary intents.
pub fn main_menu() -> Message {
    Message::new(WELCOME).with_options(vec![
        ReplyOption::new("🎯 Add Player", Intent::AddPlayer),
        ReplyOption::new("📊 Add Game Result", Intent::AddGame),
        ReplyOption::new("📈 Show Stats", Intent::ShowStats),
        ReplyOption::new("📋 Show Table", Intent::ShowTable),
    ])
}

fn back_to_menu() -> ReplyOption {
    ReplyOption::new("🔙 Back", Intent::Start)
}

fn back_to_stats() -> ReplyOption {
    ReplyOption::new("🔙 Back to Stats", Intent::ShowStats)
}

pub fn player_added(name: &str) -> String {
    format!("✅ Player '{}' added!", name)
}

pub fn game_recorded(winner: &str, loser: &str) -> String {
    format!("✅ Game recorded: {} beat {}", winner, loser)
}

/// User-facing text for a failed operation.
pub fn error_message(err: &LeagueError) -> String {
    match err {
        LeagueError::EmptyName => "Player name must not be empty.".to_string(),
        LeagueError::DuplicatePlayer(name) => format!("Player '{}' already exists!", name),
        LeagueError::UnknownPlayer(name) => format!(
            "Player '{}' does not exist! Add them from the menu, then start again.",
            name
        ),
        LeagueError::SamePlayer => {
            "Winner and loser must be different! Start again from the menu.".to_string()
        }
        LeagueError::NotEnoughPlayers { required, .. } => {
            format!("You need at least {} players to record a game.", required)
        }
        LeagueError::NoGames => "No games played yet.".to_string(),
        LeagueError::Io(_) | LeagueError::Serde(_) | LeagueError::Csv(_) => {
            "Something went wrong with the league data. Nothing was changed.".to_string()
        }
    }
}

/// General stats message.
pub fn general_summary(summary: &GeneralSummary) -> Message {
    let best = &summary.best_win_rate;
    let text = format!(
        "📊 *General Stats*\n\n\
         Total games played: {}\n\
         Top player: *{}* ({} wins, {:.1}% of all games)\n\
         Best win rate: {} ({:.1}%)",
        summary.total_games,
        summary.top_player,
        summary.top_player_wins,
        summary.top_player_share,
        best.name,
        best.win_rate,
    );
    Message::new(text).with_options(vec![back_to_menu()])
}

/// Full players table, one line per player.
pub fn players_table(rows: &[PlayerStats]) -> Message {
    let mut text = String::from("📋 *Players Table*\n");
    if rows.is_empty() {
        text.push_str("\nNo games played yet.");
    }
    for (i, row) in rows.iter().enumerate() {
        text.push_str(&format!(
            "\n{}. {}: {}W {}L ({} games, {:.1}%)",
            i + 1,
            row.name,
            row.wins,
            row.losses,
            row.total,
            row.win_rate
        ));
    }
    Message::new(text).with_options(vec![back_to_menu()])
}

/// Menu of every player pairing.
pub fn head_to_head_menu(pairs: &[(PlayerName, PlayerName)]) -> Message {
    let mut options: Vec<ReplyOption> = pairs
        .iter()
        .map(|(p1, p2)| {
            ReplyOption::new(
                format!("{} vs {}", p1, p2),
                Intent::HeadToHead {
                    p1: p1.clone(),
                    p2: p2.clone(),
                },
            )
        })
        .collect();
    options.push(back_to_menu());
    Message::new(HEAD_TO_HEAD_TITLE).with_options(options)
}

/// Head-to-head result between two players.
pub fn head_to_head(h2h: &HeadToHead) -> Message {
    let result = match h2h.win_rates() {
        None => "No games between them.".to_string(),
        Some((p1_rate, p2_rate)) => format!(
            "{}: {}W ({:.1}%)\n{}: {}W ({:.1}%)",
            h2h.p1, h2h.p1_wins, p1_rate, h2h.p2, h2h.p2_wins, p2_rate
        ),
    };
    let text = format!(
        "⚔️ *{} vs {}*\n\nGames played: {}\n{}",
        h2h.p1, h2h.p2, h2h.total, result
    );
    Message::new(text).with_options(vec![back_to_stats()])
}

/// Players table as CSV. The header row is written even when there are no rows.
pub fn table_csv(rows: &[PlayerStats]) -> Result<String, LeagueError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(["name", "wins", "losses", "total", "win_rate"])?;
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| LeagueError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| LeagueError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
