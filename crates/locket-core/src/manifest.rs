use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::defaults::default_games;
use crate::game::{GameDescriptor, GameId, validate_slug};
use crate::source::{SourceError, read_json};

/// Conventional location of the manifest relative to the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = "games/manifest.json";

/// Where the active manifest was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ManifestOrigin {
    File(PathBuf),
    BuiltIn,
}

/// Ordered list of game descriptors. Ids and slugs are unique.
#[derive(Debug, Clone)]
pub struct Manifest {
    games: Vec<GameDescriptor>,
    origin: ManifestOrigin,
}

impl Manifest {
    /// Build a manifest, dropping entries whose id or slug was already seen.
    pub fn new(games: Vec<GameDescriptor>, origin: ManifestOrigin) -> Self {
        let mut seen_ids: HashSet<GameId> = HashSet::new();
        let mut seen_slugs: HashSet<String> = HashSet::new();
        let mut kept = Vec::with_capacity(games.len());
        for game in games {
            if !seen_ids.insert(game.id.clone()) {
                tracing::warn!(id = %game.id, "Duplicate game id in manifest, keeping first");
                continue;
            }
            if !seen_slugs.insert(game.slug.clone()) {
                tracing::warn!(slug = %game.slug, "Duplicate game slug in manifest, keeping first");
                continue;
            }
            kept.push(game);
        }
        Self {
            games: kept,
            origin,
        }
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self::new(default_games(), ManifestOrigin::BuiltIn)
    }

    /// Decode a manifest document (`{"games": [...]}`), skipping unusable entries.
    pub fn from_document(doc: Value, path: &Path) -> Result<Self, SourceError> {
        let Value::Object(mut root) = doc else {
            return Err(SourceError::Shape {
                path: path.to_path_buf(),
                reason: "top level is not an object",
            });
        };
        let Some(Value::Array(entries)) = root.remove("games") else {
            return Err(SourceError::Shape {
                path: path.to_path_buf(),
                reason: "missing `games` array",
            });
        };

        let mut games = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match decode_entry(entry) {
                Ok(game) => games.push(game),
                Err(reason) => {
                    tracing::warn!(
                        index,
                        %reason,
                        path = %path.display(),
                        "Skipping manifest entry"
                    );
                },
            }
        }
        Ok(Self::new(games, ManifestOrigin::File(path.to_path_buf())))
    }

    pub fn games(&self) -> &[GameDescriptor] {
        &self.games
    }

    pub fn origin(&self) -> &ManifestOrigin {
        &self.origin
    }

    pub fn get(&self, id: &GameId) -> Option<&GameDescriptor> {
        self.games.iter().find(|g| &g.id == id)
    }

    pub fn by_slug(&self, slug: &str) -> Option<&GameDescriptor> {
        self.games.iter().find(|g| g.slug == slug)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

fn decode_entry(entry: Value) -> Result<GameDescriptor, String> {
    let game: GameDescriptor = serde_json::from_value(entry).map_err(|e| e.to_string())?;
    if game.id.as_str().is_empty() {
        return Err("empty id".to_string());
    }
    validate_slug(&game.slug).map_err(|e| e.to_string())?;
    Ok(game)
}

/// Read-once cache over the manifest file.
///
/// The first `load()` reads the file; later calls return the same `Arc`
/// until `reload()` is called. Any failure falls back to the built-in
/// catalog, so the result is never empty.
#[derive(Debug)]
pub struct ManifestStore {
    path: PathBuf,
    cached: Option<Arc<Manifest>>,
}

impl Default for ManifestStore {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_PATH)
    }
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached manifest, if one has been loaded.
    pub fn cached(&self) -> Option<Arc<Manifest>> {
        self.cached.clone()
    }

    pub fn load(&mut self) -> Arc<Manifest> {
        if let Some(manifest) = &self.cached {
            return Arc::clone(manifest);
        }
        self.reload()
    }

    /// Discard the cache and read the source again.
    pub fn reload(&mut self) -> Arc<Manifest> {
        let manifest = Arc::new(self.read_or_default());
        self.cached = Some(Arc::clone(&manifest));
        manifest
    }

    fn read_or_default(&self) -> Manifest {
        match read_json(&self.path).and_then(|doc| Manifest::from_document(doc, &self.path)) {
            Ok(manifest) if !manifest.is_empty() => {
                tracing::info!(
                    games = manifest.len(),
                    path = %self.path.display(),
                    "Loaded game manifest"
                );
                manifest
            },
            Ok(_) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Manifest has no usable games, using built-in catalog"
                );
                Manifest::builtin()
            },
            Err(e) if e.is_missing() => {
                tracing::info!(
                    path = %self.path.display(),
                    "No manifest found, using built-in catalog"
                );
                Manifest::builtin()
            },
            Err(e) => {
                tracing::warn!("{e}, using built-in catalog");
                Manifest::builtin()
            },
        }
    }
}
