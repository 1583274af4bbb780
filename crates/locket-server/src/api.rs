use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use locket_core::catalog::{self, Facets, Filter, SortKey};
use locket_core::game::{GameDescriptor, GameId};
use locket_core::manifest::ManifestOrigin;

use crate::error::AppError;
use crate::state::AppState;

/// Query string for the gallery listing. Missing filters mean `All`.
#[derive(Debug, Default, Deserialize)]
pub struct GamesQuery {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub count: usize,
    pub games: Vec<GameDescriptor>,
}

/// GET /api/v1/games — filtered and sorted gallery.
pub async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<GamesQuery>,
) -> Result<Json<GamesResponse>, AppError> {
    let category = query.category.as_deref().map_or(Filter::All, Filter::parse);
    let difficulty = query
        .difficulty
        .as_deref()
        .map_or(Filter::All, Filter::parse);
    let sort = match query.sort.as_deref() {
        Some(s) => s
            .parse::<SortKey>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
        None => SortKey::default(),
    };

    let manifest = state.manifest().await;
    let games: Vec<GameDescriptor> = catalog::select(manifest.games(), &category, &difficulty, sort)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(GamesResponse {
        count: games.len(),
        games,
    }))
}

/// GET /api/v1/games/facets
pub async fn get_facets(State(state): State<AppState>) -> Json<Facets> {
    let manifest = state.manifest().await;
    Json(catalog::facets(manifest.games()))
}

/// GET /api/v1/games/{id}
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameDescriptor>, AppError> {
    let manifest = state.manifest().await;
    manifest
        .get(&GameId::from(id.as_str()))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Game {id} not found")))
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub count: usize,
    pub origin: ManifestOrigin,
}

/// POST /api/v1/manifest/reload — re-read the manifest from disk.
pub async fn reload_manifest(State(state): State<AppState>) -> Json<ReloadResponse> {
    let manifest = state.reload().await;
    tracing::info!(games = manifest.len(), "Manifest reloaded on request");
    Json(ReloadResponse {
        count: manifest.len(),
        origin: manifest.origin().clone(),
    })
}
