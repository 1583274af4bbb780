use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::game::{GameDescriptor, title_case, validate_slug};
use crate::game_config::DEFAULT_GAMES_DIR;

/// Hosting domain of published game pages.
pub const DEFAULT_PAGES_DOMAIN: &str = "github.io";

/// Entry page of a game inside its folder.
pub const INDEX_FILE_NAME: &str = "index.html";

/// The launcher form's pre-filled host value, which is never a real account.
pub const UNSET_HOST: &str = "your-username";

/// Shown in place of a game that has no playable content yet.
pub const UNDER_DEVELOPMENT: &str = "Game under development!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    InvalidRemoteTarget(String),
}

impl fmt::Display for EmbedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRemoteTarget(m) => write!(f, "invalid remote target: {m}"),
        }
    }
}

impl std::error::Error for EmbedError {}

/// Account and repository a game collection is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    host: String,
    repository: String,
}

impl RemoteTarget {
    pub fn new(host: &str, repository: &str) -> Result<Self, EmbedError> {
        let host = host.trim();
        let repository = repository.trim();
        check_segment("host", host)?;
        check_segment("repository", repository)?;
        if host == UNSET_HOST {
            return Err(EmbedError::InvalidRemoteTarget(
                "host is still the placeholder value".to_string(),
            ));
        }
        Ok(Self {
            host: host.to_string(),
            repository: repository.to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }
}

fn check_segment(name: &str, value: &str) -> Result<(), EmbedError> {
    if value.is_empty() {
        return Err(EmbedError::InvalidRemoteTarget(format!("{name} is empty")));
    }
    if value.chars().any(|c| c == '/' || c.is_whitespace()) {
        return Err(EmbedError::InvalidRemoteTarget(format!(
            "{name} must be a single path segment"
        )));
    }
    Ok(())
}

/// How a selected game is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedMode {
    Local,
    Remote(RemoteTarget),
    Placeholder,
}

/// Descriptive card shown when no playable content is embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderCard {
    pub icon: String,
    pub title: String,
    pub short_desc: String,
    pub estimated_play_time: String,
    pub category: String,
    pub difficulty: String,
    pub notice: String,
}

impl PlaceholderCard {
    pub fn for_game(game: &GameDescriptor) -> Self {
        Self {
            icon: game.display_icon.clone(),
            title: game.title.clone(),
            short_desc: game.short_desc.clone(),
            estimated_play_time: game.estimated_play_time.clone(),
            category: title_case(&game.category),
            difficulty: title_case(game.difficulty.as_str()),
            notice: UNDER_DEVELOPMENT.to_string(),
        }
    }
}

/// Outcome of resolving a game for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedResult {
    /// Local page bytes, embedded verbatim.
    Local { path: PathBuf, content: Vec<u8> },
    /// Local page is absent; the game is still in development.
    NotFound { path: PathBuf },
    /// Hosted page to load in a frame. Reachability is not checked.
    Remote { url: String },
    Placeholder(PlaceholderCard),
}

/// Resolves games to playable content.
#[derive(Debug, Clone)]
pub struct GameEmbedder {
    games_dir: PathBuf,
    pages_domain: String,
}

impl Default for GameEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_GAMES_DIR, DEFAULT_PAGES_DOMAIN)
    }
}

impl GameEmbedder {
    pub fn new(games_dir: impl Into<PathBuf>, pages_domain: impl Into<String>) -> Self {
        Self {
            games_dir: games_dir.into(),
            pages_domain: pages_domain.into(),
        }
    }

    pub fn local_path(&self, slug: &str) -> PathBuf {
        self.games_dir.join(slug).join(INDEX_FILE_NAME)
    }

    /// `https://{host}.{pages_domain}/{repository}/games/{slug}/`
    pub fn remote_url(&self, slug: &str, target: &RemoteTarget) -> String {
        format!(
            "https://{}.{}/{}/games/{slug}/",
            target.host, self.pages_domain, target.repository
        )
    }

    pub fn resolve(&self, game: &GameDescriptor, mode: &EmbedMode) -> EmbedResult {
        match mode {
            EmbedMode::Local => self.resolve_local(&game.slug),
            EmbedMode::Remote(target) => EmbedResult::Remote {
                url: self.remote_url(&game.slug, target),
            },
            EmbedMode::Placeholder => EmbedResult::Placeholder(PlaceholderCard::for_game(game)),
        }
    }

    fn resolve_local(&self, slug: &str) -> EmbedResult {
        let path = self.local_path(slug);
        if let Err(e) = validate_slug(slug) {
            tracing::warn!("{e}, refusing local embed");
            return EmbedResult::NotFound { path };
        }
        match std::fs::read(&path) {
            Ok(content) => EmbedResult::Local { path, content },
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    tracing::info!(path = %path.display(), "Game file not found");
                } else {
                    tracing::warn!(path = %path.display(), "Cannot read game file: {e}");
                }
                EmbedResult::NotFound { path }
            },
        }
    }
}

/// Insert `window.REMOTE_CONFIG = {...}` into a UTF-8 page so the game can
/// pick up tuned parameters. Non-UTF-8 content is returned unchanged.
pub fn inject_config(content: Vec<u8>, config: &Map<String, Value>) -> Vec<u8> {
    let html = match String::from_utf8(content) {
        Ok(html) => html,
        Err(e) => return e.into_bytes(),
    };
    let json = Value::Object(config.clone()).to_string().replace("</", "<\\/");
    let script = format!("<script>window.REMOTE_CONFIG = {json};</script>");

    let at = html.to_ascii_lowercase().find("</head>").unwrap_or(0);
    let mut out = String::with_capacity(html.len() + script.len());
    out.push_str(&html[..at]);
    out.push_str(&script);
    out.push_str(&html[at..]);
    out.into_bytes()
}
