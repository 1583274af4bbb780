pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod play;
pub mod session;
pub mod state;

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::{get, post, put};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig) -> (Router<()>, AppState) {
    let games_dir = config.games_dir.clone();
    let state = AppState::new(config);

    let api_routes = Router::new()
        .route("/games", get(api::list_games))
        .route("/games/facets", get(api::get_facets))
        .route("/games/{id}", get(api::get_game))
        .route("/manifest/reload", post(api::reload_manifest))
        .route("/sessions", post(play::create_session))
        .route(
            "/session/selection",
            put(play::put_selection).get(play::get_selection),
        )
        .route("/session/embed", get(play::get_embed))
        .route(
            "/session/tuning",
            get(play::get_tuning)
                .post(play::post_tuning)
                .delete(play::reset_tuning),
        )
        .route(
            "/session/scores",
            post(play::post_score).get(play::get_scores),
        )
        // Session state changes between calls; never let clients cache it.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api/v1", api_routes)
        .nest_service("/games", ServeDir::new(&games_dir))
        .with_state(state.clone());

    (app, state)
}
