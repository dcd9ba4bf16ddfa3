//! League business logic: aggregates, the conversation controller, rendering.

pub mod conversation;
pub mod render;
pub mod stats;

pub use conversation::{
    Controller, Conversation, ConversationState, Intent, Message, Reply, ReplyOption,
};
pub use stats::{
    all_players_table, general_summary, head_to_head, head_to_head_pairs, GeneralSummary,
    HeadToHead,
};
