use std::net::SocketAddr;
use std::time::Duration;

use locket_core::test_helpers::{ScratchDir, example_manifest_json};

use locket_server::build_app;
use locket_server::config::{ServerConfig, SessionsConfig};
use locket_server::session::SESSION_HEADER;

pub const BRICK_BLASTER_PAGE: &str =
    "<html><head><title>Brick Blaster</title></head><body>bricks</body></html>";

pub const BRICK_BLASTER_CONFIG: &str = r#"{"paddleWidth": 100, "ballSpeed": 5.0, "theme": "neon"}"#;

pub struct TestServer {
    pub addr: SocketAddr,
    pub games: ScratchDir,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a server over the two-game example catalog. Only brick-blaster
    /// has a playable page and a config file.
    pub async fn new() -> Self {
        let games = ScratchDir::new();
        games.write("manifest.json", example_manifest_json());
        games.write("brick-blaster/index.html", BRICK_BLASTER_PAGE);
        games.write("brick-blaster/game-config.json", BRICK_BLASTER_CONFIG);
        Self::from_games(games, SessionsConfig::default()).await
    }

    /// Start a server whose manifest path does not exist.
    pub async fn with_missing_manifest() -> Self {
        Self::from_games(ScratchDir::new(), SessionsConfig::default()).await
    }

    pub async fn with_session_limit(max_sessions: usize) -> Self {
        let games = ScratchDir::new();
        games.write("manifest.json", example_manifest_json());
        let sessions = SessionsConfig {
            max_sessions,
            ..SessionsConfig::default()
        };
        Self::from_games(games, sessions).await
    }

    async fn from_games(games: ScratchDir, sessions: SessionsConfig) -> Self {
        let config = ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            games_dir: games.path().display().to_string(),
            manifest_path: games.path().join("manifest.json").display().to_string(),
            sessions,
            ..ServerConfig::default()
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, _state) = build_app(config);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            games,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn api(&self, path: &str) -> String {
        format!("http://{}/api/v1{path}", self.addr)
    }

    /// Create a session and return its id.
    pub async fn new_session(&self, client: &reqwest::Client) -> String {
        let resp = client.post(self.api("/sessions")).send().await.unwrap();
        assert_eq!(resp.status(), 201);
        let body: serde_json::Value = resp.json().await.unwrap();
        body["session_id"].as_str().unwrap().to_string()
    }

    /// Create a session with `game_id` already selected.
    pub async fn session_with(&self, client: &reqwest::Client, game_id: &str) -> String {
        let session = self.new_session(client).await;
        let resp = client
            .put(self.api("/session/selection"))
            .header(SESSION_HEADER, &session)
            .json(&serde_json::json!({ "game_id": game_id }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        session
    }
}
