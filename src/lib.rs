//! Pool league tracker: library with models, persistence, stats and the conversation logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::Config;
pub use logic::{
    all_players_table, general_summary, head_to_head, head_to_head_pairs, Controller,
    Conversation, ConversationState, GeneralSummary, HeadToHead, Intent, Message, Reply,
    ReplyOption,
};
pub use models::{GameResult, LeagueData, LeagueError, PlayerName, PlayerStats};
pub use store::{JsonFileStore, MemoryStore, Store};
