use serde::Deserialize;

use locket_core::embed::DEFAULT_PAGES_DOMAIN;
use locket_core::game_config::DEFAULT_GAMES_DIR;
use locket_core::manifest::DEFAULT_MANIFEST_PATH;

/// Top-level server configuration, loaded from `locket.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Root folder with one sub-folder per game slug. Also served at `/games`.
    pub games_dir: String,
    pub manifest_path: String,
    pub embed: EmbedConfig,
    pub sessions: SessionsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8501".to_string(),
            games_dir: DEFAULT_GAMES_DIR.to_string(),
            manifest_path: DEFAULT_MANIFEST_PATH.to_string(),
            embed: EmbedConfig::default(),
            sessions: SessionsConfig::default(),
        }
    }
}

/// Game embedding settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Domain that hosts published game pages (`{host}.{pages_domain}`).
    pub pages_domain: String,
    /// Repository used for remote embedding when the request names none.
    pub default_repository: String,
    /// Suggested frame height in pixels for embedded pages.
    pub frame_height: u32,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            pages_domain: DEFAULT_PAGES_DOMAIN.to_string(),
            default_repository: "RetroPocketLocket".to_string(),
            frame_height: 600,
        }
    }
}

/// Player session lifecycle.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    pub idle_timeout_secs: u64,
    pub max_sessions: usize,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3600,
            max_sessions: 1000,
        }
    }
}

impl ServerConfig {
    /// Validate configuration, exiting on settings the server cannot run with.
    pub fn validate(&self) {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            tracing::error!(
                addr = %self.listen_addr,
                "listen_addr is not a valid socket address"
            );
            std::process::exit(1);
        }
        if self.embed.pages_domain.trim().is_empty() {
            tracing::error!("embed.pages_domain must not be empty");
            std::process::exit(1);
        }
        if self.embed.frame_height == 0 {
            tracing::error!("embed.frame_height must be > 0");
            std::process::exit(1);
        }
        if self.sessions.idle_timeout_secs == 0 {
            tracing::error!("sessions.idle_timeout_secs must be > 0");
            std::process::exit(1);
        }
        if self.sessions.max_sessions == 0 {
            tracing::error!("sessions.max_sessions must be > 0");
            std::process::exit(1);
        }

        if !std::path::Path::new(&self.games_dir).is_dir() {
            tracing::warn!(
                games_dir = %self.games_dir,
                "games_dir does not exist; every local embed will report the game as under \
                 development"
            );
        }
    }

    /// Load config from `locket.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("locket.toml") {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from locket.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse locket.toml: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No locket.toml found, using defaults");
                ServerConfig::default()
            },
        };

        if let Ok(addr) = std::env::var("LOCKET_LISTEN_ADDR")
            && !addr.is_empty()
        {
            config.listen_addr = addr;
        }
        if let Ok(dir) = std::env::var("LOCKET_GAMES_DIR")
            && !dir.is_empty()
        {
            config.games_dir = dir;
        }
        if let Ok(path) = std::env::var("LOCKET_MANIFEST_PATH")
            && !path.is_empty()
        {
            config.manifest_path = path;
        }
        if let Ok(domain) = std::env::var("LOCKET_PAGES_DOMAIN")
            && !domain.is_empty()
        {
            config.embed.pages_domain = domain;
        }
        if let Ok(val) = std::env::var("LOCKET_SESSION_IDLE_SECS")
            && let Ok(n) = val.parse::<u64>()
        {
            config.sessions.idle_timeout_secs = n;
        }
        if let Ok(val) = std::env::var("LOCKET_MAX_SESSIONS")
            && let Ok(n) = val.parse::<usize>()
        {
            config.sessions.max_sessions = n;
        }

        config
    }
}
