use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::defaults::default_config;
use crate::game::validate_slug;
use crate::source::{SourceError, read_json};

/// Conventional root directory holding one folder per game slug.
pub const DEFAULT_GAMES_DIR: &str = "games";

/// File name of a game's tuning parameters inside its folder.
pub const CONFIG_FILE_NAME: &str = "game-config.json";

/// Tuning parameters for one game, in source key order.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    slug: String,
    params: Map<String, Value>,
}

impl GameConfig {
    pub fn new(slug: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            slug: slug.into(),
            params,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }
}

/// Per-slug read-once cache over `games/{slug}/game-config.json`.
#[derive(Debug)]
pub struct ConfigStore {
    games_dir: PathBuf,
    cache: HashMap<String, Arc<GameConfig>>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_GAMES_DIR)
    }
}

impl ConfigStore {
    pub fn new(games_dir: impl Into<PathBuf>) -> Self {
        Self {
            games_dir: games_dir.into(),
            cache: HashMap::new(),
        }
    }

    /// Path of the config file for `slug`.
    pub fn config_path(&self, slug: &str) -> PathBuf {
        self.games_dir.join(slug).join(CONFIG_FILE_NAME)
    }

    pub fn cached(&self, slug: &str) -> Option<Arc<GameConfig>> {
        self.cache.get(slug).cloned()
    }

    /// Load the parameters for `slug`, falling back to the built-in defaults
    /// for known games or an empty mapping otherwise.
    pub fn load(&mut self, slug: &str) -> Arc<GameConfig> {
        if let Some(config) = self.cache.get(slug) {
            return Arc::clone(config);
        }
        let config = Arc::new(GameConfig::new(slug, self.read_or_default(slug)));
        self.cache.insert(slug.to_string(), Arc::clone(&config));
        config
    }

    /// Drop every cached config so the next `load` re-reads disk.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    fn read_or_default(&self, slug: &str) -> Map<String, Value> {
        if let Err(e) = validate_slug(slug) {
            tracing::warn!("{e}, not reading config from disk");
            return fallback(slug);
        }
        let path = self.config_path(slug);
        match read_object(&path) {
            Ok(params) => {
                tracing::debug!(slug, params = params.len(), "Loaded game config");
                params
            },
            Err(e) if e.is_missing() => {
                tracing::debug!(
                    slug,
                    path = %path.display(),
                    "No game config on disk, using defaults"
                );
                fallback(slug)
            },
            Err(e) => {
                tracing::warn!("{e}, using default config for {slug}");
                fallback(slug)
            },
        }
    }
}

fn read_object(path: &Path) -> Result<Map<String, Value>, SourceError> {
    match read_json(path)? {
        Value::Object(map) => Ok(map),
        _ => Err(SourceError::Shape {
            path: path.to_path_buf(),
            reason: "config is not a JSON object",
        }),
    }
}

fn fallback(slug: &str) -> Map<String, Value> {
    default_config(slug).unwrap_or_default()
}
