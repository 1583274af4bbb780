use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use locket_core::manifest::ManifestOrigin;

use crate::state::AppState;

/// Structured health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub catalog: CatalogInfo,
    pub sessions: usize,
}

#[derive(Serialize)]
pub struct CatalogInfo {
    pub games: usize,
    pub origin: ManifestOrigin,
}

/// Structured health check endpoint. Returns server status, catalog size
/// and live session count as JSON.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let manifest = state.manifest().await;
    let sessions = state.sessions.read().await.len();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        catalog: CatalogInfo {
            games: manifest.len(),
            origin: manifest.origin().clone(),
        },
        sessions,
    })
}

/// Readiness check: the catalog has at least one game to offer.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.manifest().await.is_empty() {
        return (StatusCode::SERVICE_UNAVAILABLE, "not ready: no games in manifest");
    }
    (StatusCode::OK, "ready")
}
