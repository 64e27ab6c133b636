/// Shared data structures for the review session
///
/// These structs represent the data model that flows between
/// the library layer and the UI layer.

use chrono::{DateTime, Utc};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Approximate capture location, when the source knows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One reviewable photo.
///
/// Identity is the `id` string, which is stable for the duration of a
/// session and unique within it. Equality and hashing go through `id`
/// only; the metadata is informational.
#[derive(Debug, Clone)]
pub struct Photo {
    /// Stable identifier, unique within a session
    pub id: String,
    /// Full path to the image file
    pub path: PathBuf,
    /// Filename only (e.g., "IMG_0412.jpg")
    pub filename: String,
    /// Capture or file-creation time, when known
    pub created: Option<DateTime<Utc>>,
    /// Capture location, when known
    pub location: Option<GeoPoint>,
}

impl Photo {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Photo {
            id: id.into(),
            path,
            filename,
            created: None,
            location: None,
        }
    }
}

impl PartialEq for Photo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Photo {}

impl Hash for Photo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// The decision recorded for a reviewed photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Delete,
}

impl Decision {
    /// Short badge label shown in the filmstrip.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Keep => "KEEP",
            Decision::Delete => "DELETE",
        }
    }

    /// Badge color as RGB, matching the swipe overlay.
    pub fn color(&self) -> (f32, f32, f32) {
        match self {
            Decision::Keep => (0.2, 0.8, 0.3),
            Decision::Delete => (0.9, 0.2, 0.2),
        }
    }
}
