use std::io;
use std::path::PathBuf;
use std::{error, fmt};

/// Error type for authoring, persistence and conversion.
#[derive(Debug)]
pub enum CollisionError {
    /// JSON parse/serialize error, with the path when one is known
    Json {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    /// File I/O error
    Io {
        path: PathBuf,
        source: io::Error,
    },
    /// Keyed-store read or write failed
    Store(String),
    /// A polygon needs at least 3 points to be a shape
    PolygonTooSmall { points: usize },
    /// Two shapes in one document share an id
    DuplicateShapeId(String),
    /// The document parsed as JSON but violates the format
    InvalidDocument(String),
}

impl fmt::Display for CollisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionError::Json { path: Some(p), source } => {
                write!(f, "JSON error in {}: {}", p.display(), source)
            }
            CollisionError::Json { path: None, source } => {
                write!(f, "JSON error: {}", source)
            }
            CollisionError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            CollisionError::Store(msg) => write!(f, "Store error: {}", msg),
            CollisionError::PolygonTooSmall { points } => {
                write!(f, "Polygon needs at least 3 points, got {}", points)
            }
            CollisionError::DuplicateShapeId(id) => {
                write!(f, "Duplicate shape id in document: {}", id)
            }
            CollisionError::InvalidDocument(msg) => write!(f, "Invalid document: {}", msg),
        }
    }
}

impl From<serde_json::Error> for CollisionError {
    fn from(source: serde_json::Error) -> Self {
        CollisionError::Json { path: None, source }
    }
}

impl error::Error for CollisionError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            CollisionError::Json { source, .. } => Some(source),
            CollisionError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
