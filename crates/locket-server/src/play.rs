use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use locket_core::embed::{self, EmbedMode, EmbedResult, RemoteTarget, UNDER_DEVELOPMENT};
use locket_core::game::{GameDescriptor, GameId};
use locket_core::manifest::Manifest;
use locket_core::scores::ScoreEntry;
use locket_core::selection::SelectionStatus;
use locket_core::tuning::{self, ControlSpec, Edits};

use crate::error::AppError;
use crate::session::{Session, SessionId, SessionStore};
use crate::state::AppState;

fn session_mut<'a>(sessions: &'a mut SessionStore, id: &str) -> Result<&'a mut Session, AppError> {
    sessions
        .get_mut(id)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

fn resolve_selected(session: &Session, manifest: &Manifest) -> Result<GameDescriptor, AppError> {
    match session.selection.resolve(manifest) {
        SelectionStatus::Nothing => Err(AppError::Conflict("No game selected".to_string())),
        SelectionStatus::NotFound(id) => Err(AppError::NotFound(format!(
            "Selected game {id} is no longer in the manifest"
        ))),
        SelectionStatus::Selected(game) => Ok(game.clone()),
    }
}

/// The session's selected game and its tuned parameters, if any.
async fn selected_game(
    state: &AppState,
    session_id: &str,
) -> Result<(GameDescriptor, Option<Map<String, Value>>), AppError> {
    let manifest = state.manifest().await;
    let mut sessions = state.sessions.write().await;
    let session = session_mut(&mut sessions, session_id)?;
    let game = resolve_selected(session, &manifest)?;
    let tuned = session.tuned.get(&game.slug).cloned();
    Ok((game, tuned))
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

/// POST /api/v1/sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let mut sessions = state.sessions.write().await;
    let session_id = sessions
        .create()
        .ok_or_else(|| AppError::Unavailable("Session limit reached".to_string()))?;
    Ok((StatusCode::CREATED, Json(CreateSessionResponse { session_id })))
}

// --- Selection ---

#[derive(Debug, Deserialize)]
pub struct SelectBody {
    pub game_id: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SelectionView {
    None,
    Selected { game: GameDescriptor },
    NotFound { game_id: GameId },
}

impl From<SelectionStatus<'_>> for SelectionView {
    fn from(status: SelectionStatus<'_>) -> Self {
        match status {
            SelectionStatus::Nothing => Self::None,
            SelectionStatus::Selected(game) => Self::Selected { game: game.clone() },
            SelectionStatus::NotFound(id) => Self::NotFound {
                game_id: id.clone(),
            },
        }
    }
}

/// PUT /api/v1/session/selection — choose a game from the gallery.
pub async fn put_selection(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Json(body): Json<SelectBody>,
) -> Result<Json<SelectionView>, AppError> {
    let manifest = state.manifest().await;
    let id = GameId::from(body.game_id);
    if manifest.get(&id).is_none() {
        return Err(AppError::NotFound(format!("Game {id} not found")));
    }

    let mut sessions = state.sessions.write().await;
    let session = session_mut(&mut sessions, &session_id)?;
    session.selection.select(id);
    Ok(Json(session.selection.resolve(&manifest).into()))
}

/// GET /api/v1/session/selection
pub async fn get_selection(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Result<Json<SelectionView>, AppError> {
    let manifest = state.manifest().await;
    let mut sessions = state.sessions.write().await;
    let session = session_mut(&mut sessions, &session_id)?;
    Ok(Json(session.selection.resolve(&manifest).into()))
}

// --- Embedding ---

#[derive(Debug, Default, Deserialize)]
pub struct EmbedQuery {
    pub mode: Option<String>,
    pub host: Option<String>,
    pub repository: Option<String>,
    #[serde(default)]
    pub inject_config: bool,
}

impl EmbedQuery {
    fn embed_mode(&self, default_repository: &str) -> Result<EmbedMode, AppError> {
        match self.mode.as_deref().unwrap_or("local") {
            "local" => Ok(EmbedMode::Local),
            "placeholder" => Ok(EmbedMode::Placeholder),
            "remote" => {
                let target = RemoteTarget::new(
                    self.host.as_deref().unwrap_or_default(),
                    self.repository.as_deref().unwrap_or(default_repository),
                )?;
                Ok(EmbedMode::Remote(target))
            },
            other => Err(AppError::BadRequest(format!(
                "unknown embed mode {other:?}: expected local, remote or placeholder"
            ))),
        }
    }
}

/// GET /api/v1/session/embed — present the selected game.
pub async fn get_embed(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Query(query): Query<EmbedQuery>,
) -> Result<Response, AppError> {
    let mode = query.embed_mode(&state.config.embed.default_repository)?;
    let (game, tuned) = selected_game(&state, &session_id).await?;

    let response = match state.embedder.resolve(&game, &mode) {
        EmbedResult::Local { content, .. } => {
            let content = if query.inject_config {
                let original = state.game_config(&game.slug).await;
                let params = match tuned {
                    Some(tuned) => tuning::rebase(original.params(), &tuned),
                    None => original.params().clone(),
                };
                embed::inject_config(content, &params)
            } else {
                content
            };
            ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], content).into_response()
        },
        EmbedResult::NotFound { path } => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "status": "under_development",
                "path": path.display().to_string(),
                "message": UNDER_DEVELOPMENT,
            })),
        )
            .into_response(),
        EmbedResult::Remote { url } => Json(serde_json::json!({
            "mode": "remote",
            "url": url,
            "height": state.config.embed.frame_height,
        }))
        .into_response(),
        EmbedResult::Placeholder(card) => Json(serde_json::json!({
            "mode": "placeholder",
            "card": card,
        }))
        .into_response(),
    };
    Ok(response)
}

// --- Tuning ---

#[derive(Debug, Serialize)]
pub struct TuningView {
    pub game_id: GameId,
    /// Whether `config` holds session edits rather than the stored parameters.
    pub tuned: bool,
    pub controls: Vec<ControlSpec>,
    pub config: Map<String, Value>,
    pub document: String,
}

impl TuningView {
    /// Session edits are re-applied over `original`, so the view always has
    /// the stored key set even after the config file was reloaded.
    fn new(
        game: &GameDescriptor,
        original: &Map<String, Value>,
        tuned: Option<&Map<String, Value>>,
    ) -> Self {
        let config = match tuned {
            Some(tuned) => tuning::rebase(original, tuned),
            None => original.clone(),
        };
        Self {
            game_id: game.id.clone(),
            tuned: tuned.is_some(),
            controls: tuning::current_controls(original, &config),
            document: tuning::config_document(&config),
            config,
        }
    }
}

/// GET /api/v1/session/tuning
pub async fn get_tuning(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Result<Json<TuningView>, AppError> {
    let (game, tuned) = selected_game(&state, &session_id).await?;
    let original = state.game_config(&game.slug).await;
    Ok(Json(TuningView::new(&game, original.params(), tuned.as_ref())))
}

#[derive(Debug, Deserialize)]
pub struct TuningBody {
    pub edits: Edits,
}

/// POST /api/v1/session/tuning — merge edits into the session's parameters.
/// Nothing is written to disk.
pub async fn post_tuning(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Json(body): Json<TuningBody>,
) -> Result<Json<TuningView>, AppError> {
    let manifest = state.manifest().await;
    // Read, merge and store happen under one session guard. The config lock
    // is never held while taking the session lock.
    let mut sessions = state.sessions.write().await;
    let session = session_mut(&mut sessions, &session_id)?;
    let game = resolve_selected(session, &manifest)?;
    let original = state.game_config(&game.slug).await;
    let merged = match session.tuned.get(&game.slug) {
        Some(previous) => tuning::accumulate_edits(original.params(), previous, &body.edits),
        None => tuning::apply_edits(original.params(), &body.edits),
    };
    session.tuned.insert(game.slug.clone(), merged.clone());
    drop(sessions);
    tracing::debug!(game = %game.id, edits = body.edits.len(), "Tuning updated");

    Ok(Json(TuningView::new(&game, original.params(), Some(&merged))))
}

/// DELETE /api/v1/session/tuning — discard session edits for the selected game.
pub async fn reset_tuning(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Result<Json<TuningView>, AppError> {
    let manifest = state.manifest().await;
    let game = {
        let mut sessions = state.sessions.write().await;
        let session = session_mut(&mut sessions, &session_id)?;
        let game = resolve_selected(session, &manifest)?;
        session.tuned.remove(&game.slug);
        game
    };
    let original = state.game_config(&game.slug).await;
    Ok(Json(TuningView::new(&game, original.params(), None)))
}

// --- Scores ---

#[derive(Debug, Deserialize)]
pub struct ScoreBody {
    pub game_id: String,
    pub score: u64,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub new_best: bool,
    pub best: u64,
}

#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub scores: Vec<ScoreEntry>,
}

/// POST /api/v1/session/scores — record a finished run.
pub async fn post_score(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Json(body): Json<ScoreBody>,
) -> Result<Json<ScoreResponse>, AppError> {
    let manifest = state.manifest().await;
    let id = GameId::from(body.game_id);
    if manifest.get(&id).is_none() {
        return Err(AppError::NotFound(format!("Game {id} not found")));
    }

    let mut sessions = state.sessions.write().await;
    let session = session_mut(&mut sessions, &session_id)?;
    let new_best = session.scores.record(id.clone(), body.score);
    let best = session.scores.best(&id).unwrap_or(body.score);
    Ok(Json(ScoreResponse { new_best, best }))
}

/// GET /api/v1/session/scores
pub async fn get_scores(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Result<Json<ScoresResponse>, AppError> {
    let mut sessions = state.sessions.write().await;
    let session = session_mut(&mut sessions, &session_id)?;
    Ok(Json(ScoresResponse {
        scores: session.scores.entries(),
    }))
}
