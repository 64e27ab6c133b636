/// Filesystem asset store
///
/// Deletes committed photos from disk. The review engine assumes an
/// all-or-nothing contract, so the batch pre-checks that every file is
/// still present before removing anything; a failure partway through
/// is still reported as a single error and the engine mutates nothing.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::task;

use crate::state::photo::Photo;
use crate::state::review::AssetStore;

pub struct FileAssetStore;

#[async_trait]
impl AssetStore for FileAssetStore {
    async fn delete_batch(&self, photos: &[Photo]) -> Result<(), String> {
        let paths: Vec<(String, PathBuf)> = photos
            .iter()
            .map(|p| (p.filename.clone(), p.path.clone()))
            .collect();

        task::spawn_blocking(move || delete_files(&paths))
            .await
            .map_err(|e| format!("delete task failed: {}", e))?
    }
}

fn delete_files(paths: &[(String, PathBuf)]) -> Result<(), String> {
    for (filename, path) in paths {
        if !path.exists() {
            return Err(format!("{} is no longer on disk", filename));
        }
    }

    for (filename, path) in paths {
        std::fs::remove_file(path)
            .map_err(|e| format!("could not delete {}: {}", filename, e))?;
    }

    println!("🗑️  Removed {} files from disk", paths.len());
    Ok(())
}
