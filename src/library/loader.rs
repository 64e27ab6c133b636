/// Filesystem image loader
///
/// Decodes an image file and resizes it to the requested target for
/// one of the two cache tiers. Decoding is CPU-intensive, so it runs
/// under spawn_blocking; a failed decode is a miss, not an error.

use async_trait::async_trait;
use image::imageops::FilterType;
use tokio::task;

use crate::cache::CachedImage;
use crate::state::photo::Photo;
use crate::state::review::ImageLoader;

pub struct FileImageLoader;

#[async_trait]
impl ImageLoader for FileImageLoader {
    async fn load(&self, photo: &Photo, target: (u32, u32)) -> Option<CachedImage> {
        let path = photo.path.clone();
        let filename = photo.filename.clone();

        task::spawn_blocking(move || {
            match decode_and_resize(&path, target) {
                Ok(image) => Some(image),
                Err(e) => {
                    eprintln!("⚠️  Could not decode {}: {}", filename, e);
                    None
                }
            }
        })
        .await
        .ok()
        .flatten()
    }
}

/// Blocking decode + resize + RGBA conversion.
fn decode_and_resize(
    path: &std::path::Path,
    (max_width, max_height): (u32, u32),
) -> Result<CachedImage, String> {
    if !path.exists() {
        return Err(format!("file not found: {}", path.display()));
    }

    let decoded = image::open(path).map_err(|e| format!("decode failed: {}", e))?;

    // Lanczos3 looks best at thumbnail scale; Triangle is much faster
    // and fine for the card-size tier.
    let filter = if max_width <= 256 {
        FilterType::Lanczos3
    } else {
        FilterType::Triangle
    };

    let resized = if decoded.width() > max_width || decoded.height() > max_height {
        decoded.resize(max_width, max_height, filter)
    } else {
        decoded
    };

    let rgba = resized.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(CachedImage::from_rgba(width, height, rgba.into_raw()))
}
