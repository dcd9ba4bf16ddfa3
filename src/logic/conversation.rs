//! Conversation state machine: turns intents and free text into store
//! mutations, aggregate queries, and reply messages.
//!
//! ```text
//! Idle --add_player--> AwaitingPlayerName --text--> Idle
//! Idle --add_game-->   AwaitingWinnerName --text--> AwaitingLoserName --text--> Idle
//! ```
//! Stats queries never change the state. Rejected input always ends in `Idle`.

use crate::logic::render;
use crate::logic::stats;
use crate::models::{LeagueError, PlayerName};
use crate::store::{self, Store};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A discrete user action delivered by the front-end (button, command).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Show the main menu and drop any half-finished flow.
    Start,
    AddPlayer,
    AddGame,
    ShowStats,
    ShowTable,
    HeadToHead { p1: PlayerName, p2: PlayerName },
}

/// Where a user is in the conversation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingPlayerName,
    AwaitingWinnerName,
    /// Winner already given; next text is the loser.
    AwaitingLoserName { winner: PlayerName },
}

impl ConversationState {
    /// Winner collected so far while adding a game.
    pub fn pending_winner(&self) -> Option<&str> {
        match self {
            ConversationState::AwaitingLoserName { winner } => Some(winner),
            _ => None,
        }
    }
}

/// Per-session conversation: an id for log correlation plus the current state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    #[serde(default)]
    pub state: ConversationState,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: ConversationState::Idle,
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// A labelled choice the front-end can render as a button.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReplyOption {
    pub label: String,
    pub intent: Intent,
}

impl ReplyOption {
    pub fn new(label: impl Into<String>, intent: Intent) -> Self {
        Self {
            label: label.into(),
            intent,
        }
    }
}

/// One outgoing message (Markdown text) with optional choices.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ReplyOption>,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Vec<ReplyOption>) -> Self {
        self.options = options;
        self
    }
}

/// Everything sent back for one inbound action.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub messages: Vec<Message>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::from(Message::new(text))
    }

    pub fn then(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Text of all messages joined by blank lines.
    pub fn full_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl From<Message> for Reply {
    fn from(message: Message) -> Self {
        Self {
            messages: vec![message],
        }
    }
}

/// Drives conversations against a store. Holds no state of its own.
pub struct Controller<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> Controller<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Dispatch an intent to its handler.
    pub fn on_intent(&self, conv: &mut Conversation, intent: Intent) -> Reply {
        match intent {
            Intent::Start => self.on_start(conv),
            Intent::AddPlayer => self.on_add_player_intent(conv),
            Intent::AddGame => self.on_add_game_intent(conv),
            Intent::ShowStats => self.on_show_stats_intent(conv),
            Intent::ShowTable => self.on_show_table_intent(conv),
            Intent::HeadToHead { p1, p2 } => self.on_head_to_head_intent(conv, &p1, &p2),
        }
    }

    pub fn on_start(&self, conv: &mut Conversation) -> Reply {
        if conv.state != ConversationState::Idle {
            log::debug!("[{}] back to menu from {:?}", conv.id, conv.state);
        }
        conv.state = ConversationState::Idle;
        render::main_menu().into()
    }

    pub fn on_add_player_intent(&self, conv: &mut Conversation) -> Reply {
        conv.state = ConversationState::AwaitingPlayerName;
        Reply::text(render::ASK_PLAYER_NAME)
    }

    pub fn on_add_game_intent(&self, conv: &mut Conversation) -> Reply {
        let checked = self
            .store
            .load()
            .and_then(|data| data.ensure_can_record_games());
        if let Err(e) = checked {
            return self.fail(conv, e);
        }
        conv.state = ConversationState::AwaitingWinnerName;
        Reply::text(render::ASK_WINNER)
    }

    /// General summary followed by the head-to-head menu. State is unchanged.
    pub fn on_show_stats_intent(&self, conv: &mut Conversation) -> Reply {
        let data = match self.store.load() {
            Ok(data) => data,
            Err(e) => return self.report(conv, e),
        };
        match stats::general_summary(&data.games) {
            Ok(summary) => Reply::from(render::general_summary(&summary)).then(
                render::head_to_head_menu(&stats::head_to_head_pairs(&data.players)),
            ),
            Err(e) => self.report(conv, e),
        }
    }

    /// Full players table. State is unchanged.
    pub fn on_show_table_intent(&self, conv: &mut Conversation) -> Reply {
        match self.store.load() {
            Ok(data) => render::players_table(&stats::all_players_table(&data.games)).into(),
            Err(e) => self.report(conv, e),
        }
    }

    /// Head-to-head between two registered players. State is unchanged.
    pub fn on_head_to_head_intent(&self, conv: &mut Conversation, p1: &str, p2: &str) -> Reply {
        let data = match self.store.load() {
            Ok(data) => data,
            Err(e) => return self.report(conv, e),
        };
        if let Err(e) = data.ensure_players(&[p1, p2]) {
            return self.report(conv, e);
        }
        render::head_to_head(&stats::head_to_head(&data.games, p1, p2)).into()
    }

    /// Free text: meaning depends on the current state.
    pub fn on_text_input(&self, conv: &mut Conversation, text: &str) -> Reply {
        let text = text.trim();
        match std::mem::take(&mut conv.state) {
            ConversationState::Idle => Reply::text(render::IDLE_HINT).then(render::main_menu()),
            ConversationState::AwaitingPlayerName => match store::add_player(self.store, text) {
                Ok(name) => Reply::text(render::player_added(&name)).then(render::main_menu()),
                Err(e) => self.fail(conv, e),
            },
            ConversationState::AwaitingWinnerName => {
                conv.state = ConversationState::AwaitingLoserName {
                    winner: text.to_string(),
                };
                Reply::text(render::ASK_LOSER)
            }
            ConversationState::AwaitingLoserName { winner } => {
                match store::record_game(self.store, &winner, text) {
                    Ok(game) => Reply::text(render::game_recorded(&game.winner, &game.loser))
                        .then(render::main_menu()),
                    Err(e) => self.fail(conv, e),
                }
            }
        }
    }

    /// Report a failed step and abandon the flow.
    fn fail(&self, conv: &mut Conversation, err: LeagueError) -> Reply {
        conv.state = ConversationState::Idle;
        self.report(conv, err)
    }

    /// Report an error without touching the state.
    fn report(&self, conv: &Conversation, err: LeagueError) -> Reply {
        if err.is_storage() {
            log::error!("[{}] {}", conv.id, err);
        } else {
            log::warn!("[{}] rejected: {}", conv.id, err);
        }
        Reply::text(render::error_message(&err))
    }
}
