/// Two-tier in-memory image cache
///
/// Maps photo identifier to a decoded image handle, with independent
/// full-size and thumbnail tiers. Safe for concurrent access from
/// background prefetch tasks and UI-driven reads: all tier-map access
/// goes through one mutex, and the lock is never held across a decode.
///
/// There is no eviction policy beyond explicit removal. Entries are
/// removed exactly when a photo leaves the unreviewed state, so memory
/// stays proportional to the stack plus the prefetch window, not the
/// library size.

use std::collections::HashMap;
use std::sync::Mutex;

/// Decoded image as the renderer consumes it. The handle is cheap to
/// clone (shared bytes), so the cache hands out clones.
pub type CachedImage = iced::widget::image::Handle;

/// Which of the two independent stores an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Full,
    Thumbnail,
}

#[derive(Default)]
struct TierMaps {
    full: HashMap<String, CachedImage>,
    thumbnails: HashMap<String, CachedImage>,
}

impl TierMaps {
    fn map_mut(&mut self, tier: Tier) -> &mut HashMap<String, CachedImage> {
        match tier {
            Tier::Full => &mut self.full,
            Tier::Thumbnail => &mut self.thumbnails,
        }
    }

    fn map(&self, tier: Tier) -> &HashMap<String, CachedImage> {
        match tier {
            Tier::Full => &self.full,
            Tier::Thumbnail => &self.thumbnails,
        }
    }
}

#[derive(Default)]
pub struct ImageCache {
    inner: Mutex<TierMaps>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached image for this tier and identifier, or None on a miss.
    /// Never blocks on a miss and never triggers a fetch itself.
    pub fn get(&self, tier: Tier, id: &str) -> Option<CachedImage> {
        let inner = self.inner.lock().expect("image cache lock poisoned");
        inner.map(tier).get(id).cloned()
    }

    /// Store an image, overwriting any existing entry unconditionally.
    pub fn put(&self, tier: Tier, id: &str, image: CachedImage) {
        let mut inner = self.inner.lock().expect("image cache lock poisoned");
        inner.map_mut(tier).insert(id.to_string(), image);
    }

    /// Remove one tier's entry for this identifier. No-op on a miss.
    pub fn remove(&self, tier: Tier, id: &str) {
        let mut inner = self.inner.lock().expect("image cache lock poisoned");
        inner.map_mut(tier).remove(id);
    }

    /// Remove both tiers' entries for this identifier.
    pub fn remove_all_tiers(&self, id: &str) {
        let mut inner = self.inner.lock().expect("image cache lock poisoned");
        inner.full.remove(id);
        inner.thumbnails.remove(id);
    }

    /// Empty both tiers.
    pub fn clear_all(&self) {
        let mut inner = self.inner.lock().expect("image cache lock poisoned");
        inner.full.clear();
        inner.thumbnails.clear();
    }

    pub fn len(&self, tier: Tier) -> usize {
        let inner = self.inner.lock().expect("image cache lock poisoned");
        inner.map(tier).len()
    }
}
