//! Axum HTTP server: the daily-game endpoints.
//!
//! Handlers share the immutable catalog, the selected storage backend and
//! the resolved configuration through [`AppState`].
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/daily` | Today's puzzle (pins it on first access) |
//! | POST | `/daily/guess` | Check a guess, record its popularity |
//! | POST | `/daily/finish` | Record an outcome, rank it, reveal the answer |
//! | GET | `/daily/finish` | Histogram snapshot, no reveal |
//! | GET | `/daily/guesses` | Top guesses at one reveal level |
//! | POST | `/daily/pin` | Admin/local-only pin override |
//!
//! Stats-backend trouble never fails a player-facing request: reads come
//! back as zero histograms and writes are best-effort.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::Catalog;
use crate::constants::{DEFAULT_GUESS_LIMIT, REVEAL_LEVELS};
use crate::daily::select_daily_index;
use crate::date_key::{parse_date_key, today_key};
use crate::env_config::ServerConfig;
use crate::error::GameError;
use crate::normalize::normalize_title;
use crate::stats::{daily_score, percentile_for_reveal};
use crate::store::DailyStore;
use crate::types::Puzzle;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub store: Arc<dyn DailyStore>,
    pub config: Arc<ServerConfig>,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/daily", get(handle_get_daily))
        .route("/daily/guess", post(handle_post_guess))
        .route("/daily/finish", post(handle_post_finish).get(handle_get_finish))
        .route("/daily/guesses", get(handle_get_guesses))
        .route("/daily/pin", post(handle_post_pin))
        .layer(cors)
        .with_state(state)
}

// ── Request types ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct GuessRequest {
    guess: Option<String>,
    revealed: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct FinishRequest {
    revealed: Option<i64>,
    correct: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct GuessesQuery {
    reveal: Option<i64>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct PinRequest {
    id: Option<u32>,
    day: Option<String>,
}

// ── Daily resolution ────────────────────────────────────────────────

/// Today's puzzle for `day`: the pinned one if a pin exists, otherwise the
/// deterministic selection, pinned on first computation so later requests
/// (and later catalog edits) cannot change the day's answer.
async fn resolve_daily(state: &AppState, day: &str) -> Result<Puzzle, GameError> {
    if let Some(id) = state.store.get_pin(day).await {
        if let Some(p) = state.catalog.by_id(id) {
            return Ok(p.clone());
        }
        // Catalog shrank under an existing pin; keep serving the day from a
        // fresh selection but leave the pin alone.
        eprintln!("pinned id {id} for {day} not in catalog, recomputing");
    }

    let ids = state.catalog.ids();
    let index = select_daily_index(state.config.effective_secret(), day, &ids);
    let computed = state
        .catalog
        .by_index(index)
        .ok_or(GameError::EmptyCatalog)?
        .clone();

    let pinned = state.store.set_pin_if_absent(day, computed.id).await;
    if pinned != computed.id {
        if let Some(p) = state.catalog.by_id(pinned) {
            return Ok(p.clone());
        }
    }
    Ok(computed)
}

/// Reveal count for a guess: positive values clamp to 10, everything else
/// defaults to 1.
fn reveal_or(revealed: Option<i64>, default: i64) -> i64 {
    match revealed {
        Some(n) if n > 0 => n.min(REVEAL_LEVELS as i64),
        _ => default,
    }
}

// ── GET handlers ────────────────────────────────────────────────────

async fn handle_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

async fn handle_get_daily(State(state): State<AppState>) -> Result<impl IntoResponse, GameError> {
    let day = today_key();
    let p = resolve_daily(&state, &day).await?;
    let dev = state.config.dev_mode();

    let mut body = serde_json::json!({
        "day": day,
        "puzzle": {
            "id": p.id,
            "year": p.year,
            "emoji_clues": p.emoji_clues,
        },
        "dev": dev,
    });
    if dev {
        // Documented dev-mode relaxation: expose the answer for local testing.
        body["answer"] = serde_json::json!(p.title);
    }
    Ok(([(header::CACHE_CONTROL, "no-store")], Json(body)))
}

async fn handle_get_finish(State(state): State<AppState>) -> Json<serde_json::Value> {
    let day = today_key();
    let hist = state.store.load_histogram(&day).await;
    Json(serde_json::json!({ "total": hist.total(), "histogram": hist }))
}

async fn handle_get_guesses(
    State(state): State<AppState>,
    Query(params): Query<GuessesQuery>,
) -> Json<serde_json::Value> {
    let reveal = reveal_or(params.reveal, 1);
    let limit = params.limit.unwrap_or(DEFAULT_GUESS_LIMIT);
    let day = today_key();
    let items = state.store.top_guesses(&day, reveal, limit).await;
    Json(serde_json::json!({ "reveal": reveal, "items": items }))
}

// ── POST handlers ───────────────────────────────────────────────────

async fn handle_post_guess(
    State(state): State<AppState>,
    body: Option<Json<GuessRequest>>,
) -> Result<Json<serde_json::Value>, GameError> {
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let guess = req.guess.unwrap_or_default();
    if guess.trim().is_empty() {
        return Err(GameError::InvalidInput("missing guess".to_string()));
    }
    let r = reveal_or(req.revealed, 1);

    let day = today_key();
    let p = resolve_daily(&state, &day).await?;

    let normalized = normalize_title(&guess);
    let correct = normalized == normalize_title(&p.title);
    let next_reveal = if correct {
        r
    } else {
        (r + 1).min(REVEAL_LEVELS as i64)
    };
    let score = daily_score(r, correct);

    // Popularity is keyed by the pre-increment reveal level.
    state.store.record_guess(&day, r, &normalized).await;

    Ok(Json(serde_json::json!({
        "correct": correct,
        "revealed": next_reveal,
        "score": score,
    })))
}

async fn handle_post_finish(
    State(state): State<AppState>,
    body: Option<Json<FinishRequest>>,
) -> Result<Json<serde_json::Value>, GameError> {
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let r = reveal_or(req.revealed, REVEAL_LEVELS as i64);
    let ok = req.correct.unwrap_or(false);

    let day = today_key();
    // Bump first so the percentile includes this outcome.
    let hist = state.store.bump_histogram(&day, r, ok).await;
    let rank = percentile_for_reveal(&hist, r, ok);

    let p = resolve_daily(&state, &day).await?;
    let mut body = serde_json::json!({
        "percentile": rank.percentile,
        "total": rank.total,
        "histogram": hist,
        "id": p.id,
    });
    if !ok {
        // The title is only ever revealed once the outcome is known.
        body["answer"] = serde_json::json!(p.title);
    }
    Ok(Json(body))
}

async fn handle_post_pin(
    State(state): State<AppState>,
    body: Option<Json<PinRequest>>,
) -> Result<impl IntoResponse, GameError> {
    // Local-only: allowed without a configured secret or in file-storage mode.
    if !state.config.dev_mode() && !state.config.use_file_stats {
        return Err(GameError::Forbidden);
    }

    let req = body
        .map(|Json(b)| b)
        .ok_or_else(|| GameError::InvalidInput("invalid JSON body".to_string()))?;
    let id = req
        .id
        .ok_or_else(|| GameError::InvalidInput("missing or invalid id".to_string()))?;
    let day = match req.day {
        Some(d) => {
            parse_date_key(&d)
                .ok_or_else(|| GameError::InvalidInput("invalid day".to_string()))?;
            d
        }
        None => today_key(),
    };

    if !state.catalog.contains_id(id) {
        return Err(GameError::UnknownPuzzleId(id));
    }

    let pinned = state.store.force_set_pin(&day, id).await?;
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(serde_json::json!({ "day": day, "id": pinned })),
    ))
}
