use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use locket_core::embed::GameEmbedder;
use locket_core::game_config::{ConfigStore, GameConfig};
use locket_core::manifest::{Manifest, ManifestStore};

use crate::config::ServerConfig;
use crate::session::SessionStore;

pub type SharedManifestStore = Arc<RwLock<ManifestStore>>;
pub type SharedConfigStore = Arc<RwLock<ConfigStore>>;
pub type SharedSessionStore = Arc<RwLock<SessionStore>>;

/// Long-lived application context handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub manifests: SharedManifestStore,
    pub configs: SharedConfigStore,
    pub sessions: SharedSessionStore,
    pub embedder: Arc<GameEmbedder>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let sessions = SessionStore::new(
            Duration::from_secs(config.sessions.idle_timeout_secs),
            config.sessions.max_sessions,
        );
        Self {
            manifests: Arc::new(RwLock::new(ManifestStore::new(&config.manifest_path))),
            configs: Arc::new(RwLock::new(ConfigStore::new(&config.games_dir))),
            sessions: Arc::new(RwLock::new(sessions)),
            embedder: Arc::new(GameEmbedder::new(
                &config.games_dir,
                config.embed.pages_domain.clone(),
            )),
            config: Arc::new(config),
        }
    }

    /// The cached manifest, loading it on first use.
    pub async fn manifest(&self) -> Arc<Manifest> {
        if let Some(manifest) = self.manifests.read().await.cached() {
            return manifest;
        }
        self.manifests.write().await.load()
    }

    /// Re-read the manifest and drop cached game configs.
    pub async fn reload(&self) -> Arc<Manifest> {
        let manifest = self.manifests.write().await.reload();
        self.configs.write().await.clear();
        manifest
    }

    pub async fn game_config(&self, slug: &str) -> Arc<GameConfig> {
        if let Some(config) = self.configs.read().await.cached(slug) {
            return config;
        }
        self.configs.write().await.load(slug)
    }
}
