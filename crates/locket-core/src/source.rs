use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Why a JSON source on disk could not be used. Callers recover from every
/// variant by substituting built-in data.
#[derive(Debug)]
pub enum SourceError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Shape {
        path: PathBuf,
        reason: &'static str,
    },
}

impl SourceError {
    /// True when the file simply does not exist (the common development case).
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "malformed JSON in {}: {source}", path.display())
            },
            Self::Shape { path, reason } => {
                write!(f, "unexpected shape of {}: {reason}", path.display())
            },
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Shape { .. } => None,
        }
    }
}

/// Read and parse a JSON document from `path`.
pub(crate) fn read_json(path: &Path) -> Result<Value, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
