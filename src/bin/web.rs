//! Single binary web server: the league conversation over a JSON API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DATA_FILE,
//! SESSION_KEY, SECURE_COOKIES (see `pool_league_web::config`).
//!
//! Each browser/client keeps its conversation state in a signed session cookie;
//! the league itself lives in the JSON data file.

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    get, post,
    web::{Data, Json, Query},
    App, HttpResponse, HttpServer,
};
use pool_league_web::logic::render;
use pool_league_web::{
    all_players_table, general_summary, head_to_head, Config, Controller, Conversation,
    ConversationState, Intent, JsonFileStore, LeagueError, Message, Reply, Store,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// The league store. One action at a time holds the lock for its whole load/mutate/save cycle.
type AppState = Data<Mutex<JsonFileStore>>;

/// Session key under which the conversation is kept.
const CONVERSATION_KEY: &str = "conversation";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct ReplyResponse<'a> {
    state: &'a ConversationState,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct TextBody {
    text: String,
}

#[derive(Deserialize)]
struct HeadToHeadQuery {
    p1: String,
    p2: String,
}

fn error_response(e: &LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LeagueError::NoGames => HttpResponse::NotFound().json(body),
        _ if e.is_storage() => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// Conversation for this session; a fresh one if absent or unreadable.
fn load_conversation(session: &Session) -> Conversation {
    match session.get::<Conversation>(CONVERSATION_KEY) {
        Ok(Some(conv)) => conv,
        Ok(None) => {
            let conv = Conversation::new();
            log::info!("[{}] new conversation", conv.id);
            conv
        }
        Err(e) => {
            log::warn!("Discarding unreadable session state: {}", e);
            Conversation::new()
        }
    }
}

/// Store the (possibly changed) conversation and send the reply.
fn respond(session: &Session, conv: &Conversation, reply: &Reply) -> HttpResponse {
    if let Err(e) = session.insert(CONVERSATION_KEY, conv) {
        log::error!("[{}] could not save session: {}", conv.id, e);
        return HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": "session error" }));
    }
    HttpResponse::Ok().json(ReplyResponse {
        state: &conv.state,
        messages: &reply.messages,
    })
}

#[get("/api/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "pool-league-web",
    })
}

/// Deliver an intent (menu button / command) to the conversation.
#[post("/api/intents")]
async fn api_intent(state: AppState, session: Session, body: Json<Intent>) -> HttpResponse {
    let store = state.lock().await;
    let mut conv = load_conversation(&session);
    let reply = Controller::new(&*store).on_intent(&mut conv, body.into_inner());
    respond(&session, &conv, &reply)
}

/// Deliver free text (player name, winner, loser) to the conversation.
#[post("/api/messages")]
async fn api_message(state: AppState, session: Session, body: Json<TextBody>) -> HttpResponse {
    let store = state.lock().await;
    let mut conv = load_conversation(&session);
    let reply = Controller::new(&*store).on_text_input(&mut conv, &body.text);
    respond(&session, &conv, &reply)
}

/// Current conversation state, plus the main menu when idle.
#[get("/api/conversation")]
async fn api_conversation(session: Session) -> HttpResponse {
    let conv = load_conversation(&session);
    let reply = match conv.state {
        ConversationState::Idle => Reply::from(render::main_menu()),
        _ => Reply::default(),
    };
    respond(&session, &conv, &reply)
}

#[get("/api/players")]
async fn api_players(state: AppState) -> HttpResponse {
    let store = state.lock().await;
    match store.load() {
        Ok(data) => HttpResponse::Ok().json(data.players),
        Err(e) => error_response(&e),
    }
}

#[get("/api/stats/summary")]
async fn api_stats_summary(state: AppState) -> HttpResponse {
    let store = state.lock().await;
    match store.load().and_then(|data| general_summary(&data.games)) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response(&e),
    }
}

#[get("/api/stats/table")]
async fn api_stats_table(state: AppState) -> HttpResponse {
    let store = state.lock().await;
    match store.load() {
        Ok(data) => HttpResponse::Ok().json(all_players_table(&data.games)),
        Err(e) => error_response(&e),
    }
}

#[get("/api/stats/table.csv")]
async fn api_stats_table_csv(state: AppState) -> HttpResponse {
    let store = state.lock().await;
    match store
        .load()
        .and_then(|data| render::table_csv(&all_players_table(&data.games)))
    {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => error_response(&e),
    }
}

#[get("/api/stats/head-to-head")]
async fn api_stats_head_to_head(state: AppState, query: Query<HeadToHeadQuery>) -> HttpResponse {
    let store = state.lock().await;
    let data = match store.load() {
        Ok(data) => data,
        Err(e) => return error_response(&e),
    };
    if let Err(e) = data.ensure_players(&[query.p1.as_str(), query.p2.as_str()]) {
        return error_response(&e);
    }
    HttpResponse::Ok().json(head_to_head(&data.games, &query.p1, &query.p2))
}

/// Signing key from config, or a random one for this process.
fn session_key(config: &Config) -> Key {
    if let Some(secret) = &config.session_key {
        match Key::try_from(secret.as_bytes()) {
            Ok(key) => return key,
            Err(_) => log::warn!("SESSION_KEY unusable, generating a random key"),
        }
    } else {
        log::warn!("SESSION_KEY not set; sessions will not survive a restart");
    }
    Key::generate()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let key = session_key(&config);
    let secure_cookies = config.secure_cookies;

    let store = JsonFileStore::new(&config.data_file);
    log::info!("Using data file {}", store.path().display());
    let state = Data::new(Mutex::new(store));

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(secure_cookies)
                    .build(),
            )
            .service(api_health)
            .service(api_intent)
            .service(api_message)
            .service(api_conversation)
            .service(api_players)
            .service(api_stats_summary)
            .service(api_stats_table)
            .service(api_stats_table_csv)
            .service(api_stats_head_to_head)
    })
    .bind(bind)?
    .run()
    .await
}
