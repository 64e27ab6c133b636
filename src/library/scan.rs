/// Filesystem asset source
///
/// Walks the chosen library folder for image files and turns them into
/// `Photo` records, newest first. The photo identifier is the file's
/// canonical path string, which is stable for the session.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::task;
use walkdir::WalkDir;

use crate::state::photo::Photo;
use crate::state::review::AssetSource;

/// Supported image file extensions (lowercase)
const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"];

pub struct FolderSource {
    folder: PathBuf,
}

impl FolderSource {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        FolderSource {
            folder: folder.into(),
        }
    }
}

#[async_trait]
impl AssetSource for FolderSource {
    async fn fetch_all(&self) -> Vec<Photo> {
        let folder = self.folder.clone();
        // The walk is blocking filesystem work; keep it off the
        // interaction thread.
        task::spawn_blocking(move || scan_folder(&folder))
            .await
            .unwrap_or_default()
    }
}

/// Walk the directory tree and collect photos, newest first. An
/// unreadable folder yields an empty list; availability problems are
/// not an error the review engine models.
fn scan_folder(folder: &Path) -> Vec<Photo> {
    println!("🔍 Scanning folder: {}", folder.display());

    let mut photos = Vec::new();

    for entry in WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let Some(extension) = path.extension() else {
            continue;
        };
        let ext = extension.to_string_lossy().to_lowercase();
        if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }

        photos.push(photo_from_path(path));
    }

    // Source-defined order: reverse-chronological, like a camera roll.
    photos.sort_by(|a, b| b.created.cmp(&a.created));

    println!("📷 Found {} photos in library", photos.len());
    photos
}

fn photo_from_path(path: &Path) -> Photo {
    let canonical = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    let id = canonical.to_string_lossy().into_owned();

    let mut photo = Photo::new(id, canonical);
    photo.created = file_creation_time(path);
    photo
}

/// Creation time where the platform records one, otherwise the
/// modification time.
fn file_creation_time(path: &Path) -> Option<DateTime<Utc>> {
    let metadata = std::fs::metadata(path).ok()?;
    let time = metadata.created().or_else(|_| metadata.modified()).ok()?;
    Some(DateTime::<Utc>::from(time))
}
