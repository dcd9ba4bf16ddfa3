//! Integration tests for the conversation state machine.

use pool_league_web::{
    Controller, Conversation, ConversationState, Intent, LeagueData, LeagueError, MemoryStore,
    Store,
};
use std::io;

fn league(players: &[&str]) -> MemoryStore {
    MemoryStore::with_data(LeagueData::with_players(players.iter().copied()))
}

/// Run the whole add-game flow and return the final reply text.
fn add_game(ctl: &Controller<MemoryStore>, conv: &mut Conversation, w: &str, l: &str) -> String {
    ctl.on_intent(conv, Intent::AddGame);
    ctl.on_text_input(conv, w);
    ctl.on_text_input(conv, l).full_text()
}

#[test]
fn add_player_flow() {
    let store = MemoryStore::new();
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    let reply = ctl.on_intent(&mut conv, Intent::AddPlayer);
    assert_eq!(conv.state, ConversationState::AwaitingPlayerName);
    assert!(reply.full_text().contains("name of the new player"));

    let reply = ctl.on_text_input(&mut conv, "  Ann  ");
    assert_eq!(conv.state, ConversationState::Idle);
    assert!(reply.full_text().contains("Player 'Ann' added"));
    // Success is followed by the main menu.
    assert_eq!(reply.messages.len(), 2);
    assert!(reply.messages[1]
        .options
        .iter()
        .any(|o| o.intent == Intent::AddGame));
    assert_eq!(store.load().unwrap().players, vec!["Ann"]);
}

#[test]
fn duplicate_player_returns_to_idle() {
    let store = league(&["Ann"]);
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    ctl.on_add_player_intent(&mut conv);
    let reply = ctl.on_text_input(&mut conv, "Ann");
    assert_eq!(conv.state, ConversationState::Idle);
    assert!(reply.full_text().contains("already exists"));
    assert_eq!(store.load().unwrap().players, vec!["Ann"]);
}

#[test]
fn add_game_needs_two_players() {
    let store = league(&["Ann"]);
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    let reply = ctl.on_add_game_intent(&mut conv);
    assert_eq!(conv.state, ConversationState::Idle);
    assert!(reply.full_text().contains("at least 2 players"));
}

#[test]
fn add_game_flow_records_result() {
    let store = league(&["Ann", "Ben"]);
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    ctl.on_add_game_intent(&mut conv);
    assert_eq!(conv.state, ConversationState::AwaitingWinnerName);

    let reply = ctl.on_text_input(&mut conv, "Ann");
    assert_eq!(
        conv.state,
        ConversationState::AwaitingLoserName {
            winner: "Ann".to_string()
        }
    );
    assert_eq!(conv.state.pending_winner(), Some("Ann"));
    assert!(reply.full_text().contains("loser"));

    let reply = ctl.on_text_input(&mut conv, "Ben");
    assert_eq!(conv.state, ConversationState::Idle);
    assert!(reply.full_text().contains("Game recorded: Ann beat Ben"));

    let games = store.load().unwrap().games;
    assert_eq!(games.len(), 1);
    assert_eq!((games[0].winner.as_str(), games[0].loser.as_str()), ("Ann", "Ben"));
}

#[test]
fn same_player_is_not_recorded_and_not_retried() {
    let store = league(&["Ann", "Ben"]);
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    let text = add_game(&ctl, &mut conv, "Ann", "Ann");
    assert!(text.contains("must be different"));
    assert_eq!(conv.state, ConversationState::Idle);
    assert!(store.load().unwrap().games.is_empty());

    // The next text is not taken as a loser name.
    ctl.on_text_input(&mut conv, "Ben");
    assert!(store.load().unwrap().games.is_empty());
}

#[test]
fn unknown_player_is_not_recorded() {
    let store = league(&["Ann", "Ben"]);
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    let text = add_game(&ctl, &mut conv, "Zoe", "Ben");
    assert!(text.contains("'Zoe' does not exist"));
    assert_eq!(conv.state, ConversationState::Idle);
    assert!(store.load().unwrap().games.is_empty());
}

#[test]
fn text_while_idle_shows_menu() {
    let store = MemoryStore::new();
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    let reply = ctl.on_text_input(&mut conv, "hello");
    assert_eq!(conv.state, ConversationState::Idle);
    assert_eq!(reply.messages.len(), 2);
    assert!(store.load().unwrap().players.is_empty());
}

#[test]
fn start_abandons_pending_flow() {
    let store = league(&["Ann", "Ben"]);
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    ctl.on_add_game_intent(&mut conv);
    ctl.on_text_input(&mut conv, "Ann");
    let reply = ctl.on_intent(&mut conv, Intent::Start);
    assert_eq!(conv.state, ConversationState::Idle);
    assert_eq!(reply.messages[0].options.len(), 4);
}

#[test]
fn stats_queries_keep_state() {
    let store = league(&["Ann", "Ben", "Cat"]);
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();
    add_game(&ctl, &mut conv, "Ann", "Ben");

    ctl.on_add_game_intent(&mut conv);
    ctl.on_text_input(&mut conv, "Ben");
    let waiting = conv.state.clone();

    let stats = ctl.on_intent(&mut conv, Intent::ShowStats);
    assert_eq!(conv.state, waiting);
    assert!(stats.messages[0].text.contains("Total games played: 1"));
    assert!(stats.messages[0].text.contains("Top player: *Ann*"));
    // Head-to-head menu: 3 pairings plus Back.
    assert_eq!(stats.messages[1].options.len(), 4);

    let table = ctl.on_intent(&mut conv, Intent::ShowTable);
    assert_eq!(conv.state, waiting);
    assert!(table.full_text().contains("1. Ann: 1W 0L (1 games, 100.0%)"));

    let h2h = ctl.on_intent(
        &mut conv,
        Intent::HeadToHead {
            p1: "Ben".into(),
            p2: "Ann".into(),
        },
    );
    assert_eq!(conv.state, waiting);
    let text = h2h.full_text();
    assert!(text.contains("Games played: 1"));
    assert!(text.contains("Ben: 0W (0.0%)"));
    assert!(text.contains("Ann: 1W (100.0%)"));

    // Flow continues where it was.
    ctl.on_text_input(&mut conv, "Cat");
    assert_eq!(store.load().unwrap().games.len(), 2);
}

#[test]
fn stats_without_games() {
    let store = league(&["Ann", "Ben"]);
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    let reply = ctl.on_show_stats_intent(&mut conv);
    assert_eq!(reply.full_text(), "No games played yet.");

    let h2h = ctl.on_head_to_head_intent(&mut conv, "Ann", "Ben");
    assert!(h2h.full_text().contains("No games between them."));
}

#[test]
fn head_to_head_with_unknown_player() {
    let store = league(&["Ann", "Ben"]);
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    let reply = ctl.on_head_to_head_intent(&mut conv, "Ann", "Zoe");
    assert!(reply.full_text().contains("'Zoe' does not exist"));
}

/// Loads fine, refuses every save.
struct ReadOnlyStore(MemoryStore);

impl Store for ReadOnlyStore {
    fn load(&self) -> Result<LeagueData, LeagueError> {
        self.0.load()
    }

    fn save(&self, _data: &LeagueData) -> Result<(), LeagueError> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full").into())
    }
}

#[test]
fn failed_save_never_reports_success() {
    let store = ReadOnlyStore(league(&["Ann", "Ben"]));
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    ctl.on_add_player_intent(&mut conv);
    let reply = ctl.on_text_input(&mut conv, "Cat");
    assert!(!reply.full_text().contains("added"));
    assert!(reply.full_text().contains("Nothing was changed"));
    assert_eq!(conv.state, ConversationState::Idle);

    ctl.on_add_game_intent(&mut conv);
    ctl.on_text_input(&mut conv, "Ann");
    let reply = ctl.on_text_input(&mut conv, "Ben");
    assert!(!reply.full_text().contains("recorded"));
    assert!(store.load().unwrap().games.is_empty());
}

#[test]
fn intents_and_state_serialize_for_the_front_end() {
    let intent: Intent =
        serde_json::from_str(r#"{"intent":"head_to_head","p1":"A","p2":"B"}"#).unwrap();
    assert_eq!(
        intent,
        Intent::HeadToHead {
            p1: "A".into(),
            p2: "B".into()
        }
    );
    let intent: Intent = serde_json::from_str(r#"{"intent":"add_game"}"#).unwrap();
    assert_eq!(intent, Intent::AddGame);

    let mut conv = Conversation::new();
    conv.state = ConversationState::AwaitingLoserName {
        winner: "Ann".into(),
    };
    let json = serde_json::to_string(&conv).unwrap();
    let back: Conversation = serde_json::from_str(&json).unwrap();
    assert_eq!(back, conv);
}

#[test]
fn add_intents_restart_flow_from_any_state() {
    let store = league(&["Ann", "Ben"]);
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    ctl.on_add_game_intent(&mut conv);
    ctl.on_text_input(&mut conv, "Ann");
    assert_eq!(conv.state.pending_winner(), Some("Ann"));

    ctl.on_intent(&mut conv, Intent::AddPlayer);
    assert_eq!(conv.state, ConversationState::AwaitingPlayerName);

    ctl.on_intent(&mut conv, Intent::AddGame);
    assert_eq!(conv.state, ConversationState::AwaitingWinnerName);

    // The abandoned winner is gone; the flow starts from scratch.
    ctl.on_text_input(&mut conv, "Ben");
    ctl.on_text_input(&mut conv, "Ann");
    let games = store.load().unwrap().games;
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].winner, "Ben");
    assert_eq!(store.load().unwrap().players, vec!["Ann", "Ben"]);
}

/// Every load fails, as with an unreadable data file.
struct BrokenLoad;

impl Store for BrokenLoad {
    fn load(&self) -> Result<LeagueData, LeagueError> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "unreadable").into())
    }

    fn save(&self, _data: &LeagueData) -> Result<(), LeagueError> {
        Ok(())
    }
}

#[test]
fn failed_load_during_query_keeps_state() {
    let store = BrokenLoad;
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();
    conv.state = ConversationState::AwaitingWinnerName;

    for intent in [
        Intent::ShowTable,
        Intent::ShowStats,
        Intent::HeadToHead {
            p1: "Ann".into(),
            p2: "Ben".into(),
        },
    ] {
        let reply = ctl.on_intent(&mut conv, intent);
        assert!(reply.full_text().contains("Nothing was changed"));
        assert_eq!(conv.state, ConversationState::AwaitingWinnerName);
    }
}

#[test]
fn failed_load_during_flow_returns_to_idle() {
    let store = BrokenLoad;
    let ctl = Controller::new(&store);
    let mut conv = Conversation::new();

    ctl.on_add_player_intent(&mut conv);
    let reply = ctl.on_text_input(&mut conv, "Cat");
    assert!(reply.full_text().contains("Nothing was changed"));
    assert_eq!(conv.state, ConversationState::Idle);

    ctl.on_add_game_intent(&mut conv);
    assert_eq!(conv.state, ConversationState::Idle);
}
