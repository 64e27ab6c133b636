/// The photo review engine
///
/// Owns the ordered stack of not-yet-reviewed photos, the kept set and
/// the delete queue, and coordinates the image cache. Every loaded
/// identifier is in exactly one of three states at any time:
/// unreviewed (in the stack), kept, or queued for deletion. Every
/// mutating operation below preserves that partition.
///
/// The engine is single-owner and fully synchronous in its mutations;
/// the async halves (library fetch, image loads, batch delete) run
/// against `Arc`-shared collaborators so the UI can drive them from
/// `Task::perform` futures and apply the results afterwards. The async
/// methods here compose those same apply steps for non-UI callers.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use super::photo::{Decision, Photo};
use super::queue::DeleteQueue;
use crate::cache::{CachedImage, ImageCache, Tier};
use crate::constants::{CARD_IMAGE_SIZE, THUMBNAIL_SIZE};

/// Provides the initial ordered photo list. Authorization problems are
/// the source's concern and surface here only as an empty result.
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn fetch_all(&self) -> Vec<Photo>;
}

/// Turns a photo plus target size into a decoded image. A miss is not
/// an error; the caller shows a placeholder and may retry later.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, photo: &Photo, target: (u32, u32)) -> Option<CachedImage>;
}

/// Performs the irreversible batch delete. The engine assumes an
/// all-or-nothing contract: any failure is treated as total.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn delete_batch(&self, photos: &[Photo]) -> Result<(), String>;
}

/// The only error the engine surfaces to callers.
#[derive(Debug, Clone, Error)]
pub enum TriageError {
    #[error("failed to delete photos: {reason}")]
    CommitFailed { reason: String },
}

pub struct ReviewEngine {
    /// Not-yet-reviewed photos, front = next to review
    stack: Vec<Photo>,
    /// Every photo from the last load, in source order (filmstrip)
    all_photos: Vec<Photo>,
    /// Identifiers the user chose to keep
    kept: HashSet<String>,
    queue: DeleteQueue,
    cache: Arc<ImageCache>,
    source: Arc<dyn AssetSource>,
    loader: Arc<dyn ImageLoader>,
    store: Arc<dyn AssetStore>,
}

impl ReviewEngine {
    pub fn new(
        source: Arc<dyn AssetSource>,
        loader: Arc<dyn ImageLoader>,
        store: Arc<dyn AssetStore>,
        cache: Arc<ImageCache>,
    ) -> Self {
        ReviewEngine {
            stack: Vec::new(),
            all_photos: Vec::new(),
            kept: HashSet::new(),
            queue: DeleteQueue::new(),
            cache,
            source,
            loader,
            store,
        }
    }

    // ===== Loading =====

    /// Fetch the library and replace the review stack and kept set
    /// wholesale. The delete queue and cache survive a plain load and
    /// are only cleared by `reset`. Returns the number of photos.
    pub async fn load(&mut self) -> usize {
        let photos = self.source.fetch_all().await;
        self.install_photos(photos)
    }

    /// Synchronous half of `load`, applied by the UI when the fetch
    /// task completes. Drops duplicate identifiers so the stack
    /// invariant holds even against a misbehaving source.
    pub fn install_photos(&mut self, photos: Vec<Photo>) -> usize {
        let mut seen = HashSet::new();
        let photos: Vec<Photo> = photos
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();

        self.kept.clear();
        self.stack = photos.clone();
        self.all_photos = photos;
        self.stack.len()
    }

    /// Clear the queue, kept set, cache, and photo lists, then reload.
    pub async fn reset(&mut self) -> usize {
        self.clear_session();
        self.load().await
    }

    /// Synchronous half of `reset`.
    pub fn clear_session(&mut self) {
        self.queue.clear();
        self.kept.clear();
        self.cache.clear_all();
        self.stack.clear();
        self.all_photos.clear();
    }

    // ===== Decisions =====

    /// unreviewed|kept -> queued. Silent no-op if already queued.
    pub fn mark_for_deletion(&mut self, photo: &Photo) {
        if self.queue.contains(&photo.id) {
            return;
        }
        self.kept.remove(&photo.id);
        let owned = self.take_from_stack(&photo.id).unwrap_or_else(|| photo.clone());
        self.cache.remove(Tier::Full, &photo.id);
        self.queue.add(owned);
    }

    /// unreviewed|queued -> kept. Idempotent: keeping an already-kept
    /// photo never double-counts.
    pub fn keep(&mut self, photo: &Photo) {
        self.queue.remove_by_id(&photo.id);
        self.take_from_stack(&photo.id);
        self.cache.remove(Tier::Full, &photo.id);
        self.kept.insert(photo.id.clone());
    }

    /// Pop the most-recently-queued photo back to the front of the
    /// stack (queued -> unreviewed). Silent no-op on an empty queue.
    pub fn undo_last_delete(&mut self) {
        if let Some(photo) = self.queue.remove_last() {
            self.stack.insert(0, photo);
        }
    }

    /// Remove a photo from the delete queue by identifier and keep it
    /// (queued -> kept, deliberately not back to unreviewed: the
    /// review sheet's restore means "keep it", the stack undo means
    /// "reconsider it"). No-op if the photo is not queued.
    pub fn restore(&mut self, photo: &Photo) {
        if !self.queue.contains(&photo.id) {
            return;
        }
        self.queue.remove_by_id(&photo.id);
        self.kept.insert(photo.id.clone());
    }

    /// Make this photo the next to review. If it is mid-stack the
    /// stack is cyclically rotated, preserving the relative order of
    /// everything else. If it was already decided it is pulled out of
    /// that partition and reinserted at the front.
    pub fn move_to_front(&mut self, photo: &Photo) {
        if let Some(index) = self.stack.iter().position(|p| p.id == photo.id) {
            if index != 0 {
                self.stack.rotate_left(index);
            }
        } else {
            self.kept.remove(&photo.id);
            self.queue.remove_by_id(&photo.id);
            self.stack.insert(0, photo.clone());
        }
    }

    fn take_from_stack(&mut self, id: &str) -> Option<Photo> {
        let index = self.stack.iter().position(|p| p.id == id)?;
        Some(self.stack.remove(index))
    }

    // ===== Commit =====

    /// Delete everything in the queue through the asset store. No-op
    /// on an empty queue. On failure nothing is mutated; the queue,
    /// stack and kept set are exactly as before the call. On success
    /// the deleted photos vanish from every partition and both cache
    /// tiers. Returns the number of photos deleted.
    pub async fn commit_deletes(&mut self) -> Result<usize, TriageError> {
        if self.queue.is_empty() {
            return Ok(0);
        }

        let snapshot = self.queued_snapshot();
        self.store
            .delete_batch(&snapshot)
            .await
            .map_err(|reason| TriageError::CommitFailed { reason })?;

        self.finish_commit(&snapshot);
        Ok(snapshot.len())
    }

    /// Snapshot of the queue in insertion order, for a commit task.
    pub fn queued_snapshot(&self) -> Vec<Photo> {
        self.queue.photos().to_vec()
    }

    /// Reconcile state after the store confirmed the batch delete.
    pub fn finish_commit(&mut self, deleted: &[Photo]) {
        let ids: HashSet<&str> = deleted.iter().map(|p| p.id.as_str()).collect();

        self.queue.clear();
        self.stack.retain(|p| !ids.contains(p.id.as_str()));
        self.all_photos.retain(|p| !ids.contains(p.id.as_str()));
        for id in &ids {
            self.kept.remove(*id);
            self.cache.remove_all_tiers(id);
        }

        println!("🗑️  Deleted {} photos", deleted.len());
    }

    // ===== Queries =====

    pub fn stack(&self) -> &[Photo] {
        &self.stack
    }

    pub fn all_photos(&self) -> &[Photo] {
        &self.all_photos
    }

    pub fn kept_count(&self) -> usize {
        self.kept.len()
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    pub fn has_queued(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Kept plus queued: how many photos have been decided.
    pub fn total_reviewed(&self) -> usize {
        self.kept.len() + self.queue.len()
    }

    /// Queued photos in queue insertion order (not stack order).
    pub fn queued_photos(&self) -> Vec<Photo> {
        self.queue.photos().to_vec()
    }

    /// The recorded decision for an identifier, or None while the
    /// photo is still unreviewed (or was never loaded).
    pub fn decision_for(&self, id: &str) -> Option<Decision> {
        if self.kept.contains(id) {
            Some(Decision::Keep)
        } else if self.queue.contains(id) {
            Some(Decision::Delete)
        } else {
            None
        }
    }

    // Collaborator handles for UI tasks.

    pub fn cache(&self) -> Arc<ImageCache> {
        self.cache.clone()
    }

    pub fn source(&self) -> Arc<dyn AssetSource> {
        self.source.clone()
    }

    pub fn loader(&self) -> Arc<dyn ImageLoader> {
        self.loader.clone()
    }

    pub fn store(&self) -> Arc<dyn AssetStore> {
        self.store.clone()
    }
}

// Free fetch helpers shared by the engine methods above and the UI's
// `Task::perform` futures (which cannot borrow the engine).

/// Cache-or-load for the full-size tier. Returns the identifier with
/// the image so completion messages know which photo resolved.
pub async fn fetch_full(
    cache: Arc<ImageCache>,
    loader: Arc<dyn ImageLoader>,
    photo: Photo,
) -> Option<(String, CachedImage)> {
    fetch_tier(cache, loader, photo, Tier::Full, CARD_IMAGE_SIZE).await
}

/// Cache-or-load for the thumbnail tier.
pub async fn fetch_thumbnail(
    cache: Arc<ImageCache>,
    loader: Arc<dyn ImageLoader>,
    photo: Photo,
) -> Option<(String, CachedImage)> {
    fetch_tier(
        cache,
        loader,
        photo,
        Tier::Thumbnail,
        (THUMBNAIL_SIZE, THUMBNAIL_SIZE),
    )
    .await
}

async fn fetch_tier(
    cache: Arc<ImageCache>,
    loader: Arc<dyn ImageLoader>,
    photo: Photo,
    tier: Tier,
    target: (u32, u32),
) -> Option<(String, CachedImage)> {
    // A cached entry completes immediately without touching the loader.
    if let Some(hit) = cache.get(tier, &photo.id) {
        return Some((photo.id, hit));
    }

    let image = loader.load(&photo, target).await?;
    // Last write wins; a stale result overwriting after eviction is
    // harmless and self-corrects on the next eviction.
    cache.put(tier, &photo.id, image.clone());
    Some((photo.id, image))
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_load_fills_stack_in_source_order() {
        let engine = engine_with(&["p1", "p2", "p3"]).await;

        let ids: Vec<&str> = engine.stack().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2", "p3"]);
        assert_eq!(engine.all_photos().len(), 3);
        assert_eq!(engine.total_reviewed(), 0);
    }

    #[tokio::test]
    async fn test_load_drops_duplicate_identifiers() {
        let photos = vec![photo("p1"), photo("p2"), photo("p1")];
        let mut engine = ReviewEngine::new(
            Arc::new(FakeSource { photos }),
            Arc::new(FakeLoader::default()),
            Arc::new(FakeStore::default()),
            Arc::new(ImageCache::new()),
        );

        assert_eq!(engine.load().await, 2);
    }

    #[tokio::test]
    async fn test_keep_removes_from_stack_and_counts_once() {
        let mut engine = engine_with(&["p1", "p2", "p3"]).await;
        let p1 = photo("p1");

        engine.keep(&p1);

        assert_eq!(engine.stack().len(), 2);
        assert_eq!(engine.kept_count(), 1);
        assert_eq!(engine.decision_for("p1"), Some(Decision::Keep));

        // Caller misuse: a second keep never double-increments.
        engine.keep(&p1);
        assert_eq!(engine.kept_count(), 1);
    }

    #[tokio::test]
    async fn test_mark_for_deletion_moves_photo_to_queue() {
        let mut engine = engine_with(&["p1", "p2", "p3"]).await;

        engine.mark_for_deletion(&photo("p1"));

        assert_eq!(engine.stack().len(), 2);
        assert_eq!(engine.queued_count(), 1);
        assert_eq!(engine.decision_for("p1"), Some(Decision::Delete));
    }

    #[tokio::test]
    async fn test_mark_for_deletion_overrides_an_earlier_keep() {
        let mut engine = engine_with(&["p1", "p2"]).await;
        let p1 = photo("p1");

        engine.keep(&p1);
        engine.mark_for_deletion(&p1);

        assert_eq!(engine.kept_count(), 0);
        assert_eq!(engine.queued_count(), 1);
        assert_eq!(engine.decision_for("p1"), Some(Decision::Delete));
    }

    #[tokio::test]
    async fn test_mark_for_deletion_twice_is_a_noop() {
        let mut engine = engine_with(&["p1", "p2"]).await;
        let p1 = photo("p1");

        engine.mark_for_deletion(&p1);
        engine.mark_for_deletion(&p1);

        assert_eq!(engine.queued_count(), 1);
    }

    #[tokio::test]
    async fn test_mark_for_deletion_evicts_full_tier_only() {
        let mut engine = engine_with(&["p1", "p2"]).await;
        let cache = engine.cache();
        cache.put(Tier::Full, "p1", test_image());
        cache.put(Tier::Thumbnail, "p1", test_image());

        engine.mark_for_deletion(&photo("p1"));

        assert!(cache.get(Tier::Full, "p1").is_none());
        assert!(cache.get(Tier::Thumbnail, "p1").is_some());
    }

    #[tokio::test]
    async fn test_undo_returns_photo_to_front_of_stack() {
        let mut engine = engine_with(&["p1", "p2", "p3"]).await;

        engine.mark_for_deletion(&photo("p2"));
        engine.undo_last_delete();

        assert_eq!(engine.queued_count(), 0);
        assert_eq!(engine.stack()[0].id, "p2");
        assert_eq!(engine.decision_for("p2"), None);
    }

    #[tokio::test]
    async fn test_undo_pops_most_recently_queued_first() {
        let mut engine = engine_with(&["p1", "p2", "p3"]).await;

        engine.mark_for_deletion(&photo("p1"));
        engine.mark_for_deletion(&photo("p2"));
        engine.undo_last_delete();

        assert_eq!(engine.stack()[0].id, "p2");
        assert!(engine.decision_for("p1").is_some());
    }

    #[tokio::test]
    async fn test_undo_on_empty_queue_changes_nothing() {
        let mut engine = engine_with(&["p1", "p2"]).await;

        engine.undo_last_delete();

        assert_eq!(engine.stack().len(), 2);
        assert_eq!(engine.queued_count(), 0);
        assert_eq!(engine.kept_count(), 0);
    }

    #[tokio::test]
    async fn test_restore_transitions_to_kept_not_unreviewed() {
        let mut engine = engine_with(&["p1", "p2"]).await;
        let p1 = photo("p1");

        engine.mark_for_deletion(&p1);
        engine.restore(&p1);

        assert_eq!(engine.queued_count(), 0);
        assert_eq!(engine.kept_count(), 1);
        assert_eq!(engine.decision_for("p1"), Some(Decision::Keep));
        // Not back in the stack: restore means "keep it".
        assert!(!engine.stack().iter().any(|p| p.id == "p1"));
    }

    #[tokio::test]
    async fn test_restore_of_unqueued_photo_is_a_noop() {
        let mut engine = engine_with(&["p1", "p2"]).await;

        engine.restore(&photo("p1"));

        assert_eq!(engine.kept_count(), 0);
        assert_eq!(engine.stack().len(), 2);
    }

    #[tokio::test]
    async fn test_review_scenario_from_three_photos() {
        let mut engine = engine_with(&["p1", "p2", "p3"]).await;

        engine.mark_for_deletion(&photo("p1"));
        let ids: Vec<&str> = engine.stack().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p2", "p3"]);
        assert_eq!(engine.queued_count(), 1);

        engine.keep(&photo("p2"));
        let ids: Vec<&str> = engine.stack().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p3"]);
        assert_eq!(engine.kept_count(), 1);

        engine.undo_last_delete();
        let ids: Vec<&str> = engine.stack().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p3"]);
        assert_eq!(engine.queued_count(), 0);
    }

    #[tokio::test]
    async fn test_move_to_front_rotates_preserving_relative_order() {
        let mut engine = engine_with(&["a", "b", "c", "d"]).await;

        engine.move_to_front(&photo("c"));

        let ids: Vec<&str> = engine.stack().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["c", "d", "a", "b"]);
    }

    #[tokio::test]
    async fn test_move_to_front_of_front_photo_is_a_noop() {
        let mut engine = engine_with(&["a", "b", "c"]).await;

        engine.move_to_front(&photo("a"));

        let ids: Vec<&str> = engine.stack().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_move_to_front_pulls_a_decided_photo_back() {
        let mut engine = engine_with(&["a", "b", "c"]).await;
        let a = photo("a");

        engine.mark_for_deletion(&a);
        engine.move_to_front(&a);

        assert_eq!(engine.stack()[0].id, "a");
        assert_eq!(engine.queued_count(), 0);
        assert_eq!(engine.decision_for("a"), None);

        let b = photo("b");
        engine.keep(&b);
        engine.move_to_front(&b);

        assert_eq!(engine.stack()[0].id, "b");
        assert_eq!(engine.kept_count(), 0);
    }

    #[tokio::test]
    async fn test_total_reviewed_counts_kept_and_queued() {
        let mut engine = engine_with(&["p1", "p2", "p3"]).await;

        engine.keep(&photo("p1"));
        engine.mark_for_deletion(&photo("p2"));

        assert_eq!(engine.total_reviewed(), 2);
    }

    #[tokio::test]
    async fn test_queued_photos_reports_queue_insertion_order() {
        let mut engine = engine_with(&["p1", "p2", "p3"]).await;

        engine.mark_for_deletion(&photo("p3"));
        engine.mark_for_deletion(&photo("p1"));

        let ids: Vec<String> = engine.queued_photos().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["p3", "p1"]);
    }

    #[tokio::test]
    async fn test_commit_on_empty_queue_is_a_noop() {
        let mut engine = engine_with(&["p1"]).await;

        let deleted = engine.commit_deletes().await.unwrap();

        assert_eq!(deleted, 0);
        assert_eq!(engine.stack().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_success_reconciles_everything() {
        let mut engine = engine_with(&["p1", "p2", "p3"]).await;
        let cache = engine.cache();
        cache.put(Tier::Thumbnail, "p1", test_image());
        cache.put(Tier::Thumbnail, "p3", test_image());

        engine.mark_for_deletion(&photo("p1"));
        engine.mark_for_deletion(&photo("p3"));

        let deleted = engine.commit_deletes().await.unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(engine.queued_count(), 0);
        assert_eq!(engine.all_photos().len(), 1);
        assert_eq!(engine.all_photos()[0].id, "p2");
        assert!(cache.get(Tier::Full, "p1").is_none());
        assert!(cache.get(Tier::Thumbnail, "p1").is_none());
        assert!(cache.get(Tier::Thumbnail, "p3").is_none());
    }

    #[tokio::test]
    async fn test_commit_failure_mutates_nothing() {
        let store = FakeStore {
            fail_with: Some("library unavailable".into()),
            ..FakeStore::default()
        };
        let mut engine = engine_with_store(&["p1", "p2", "p3"], store).await;

        engine.keep(&photo("p2"));
        engine.mark_for_deletion(&photo("p1"));

        let stack_before: Vec<String> = engine.stack().iter().map(|p| p.id.clone()).collect();

        let err = engine.commit_deletes().await.unwrap_err();

        assert!(err.to_string().contains("library unavailable"));
        let stack_after: Vec<String> = engine.stack().iter().map(|p| p.id.clone()).collect();
        assert_eq!(stack_before, stack_after);
        assert_eq!(engine.queued_count(), 1);
        assert_eq!(engine.kept_count(), 1);
        assert_eq!(engine.all_photos().len(), 3);
    }

    #[tokio::test]
    async fn test_reset_clears_decisions_and_reloads() {
        let mut engine = engine_with(&["p1", "p2"]).await;
        engine.cache().put(Tier::Full, "p1", test_image());

        engine.keep(&photo("p1"));
        engine.mark_for_deletion(&photo("p2"));
        engine.reset().await;

        assert_eq!(engine.stack().len(), 2);
        assert_eq!(engine.kept_count(), 0);
        assert_eq!(engine.queued_count(), 0);
        assert_eq!(engine.cache().len(Tier::Full), 0);
    }

    #[tokio::test]
    async fn test_every_photo_sits_in_exactly_one_partition() {
        let mut engine = engine_with(&["p1", "p2", "p3", "p4"]).await;

        engine.keep(&photo("p1"));
        engine.mark_for_deletion(&photo("p2"));
        engine.mark_for_deletion(&photo("p3"));
        engine.undo_last_delete();
        engine.restore(&photo("p2"));

        for p in engine.all_photos() {
            let in_stack = engine.stack().iter().any(|s| s.id == p.id);
            let decided = engine.decision_for(&p.id).is_some();
            assert!(
                in_stack != decided,
                "{} must be in exactly one partition",
                p.id
            );
        }
    }

    #[tokio::test]
    async fn test_cached_image_skips_the_loader() {
        use std::sync::atomic::Ordering;

        let loader = Arc::new(FakeLoader::default());
        let cache = Arc::new(ImageCache::new());
        let p1 = photo("p1");

        let first = fetch_full(cache.clone(), loader.clone(), p1.clone()).await;
        assert!(first.is_some());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);

        let second = fetch_full(cache.clone(), loader.clone(), p1.clone()).await;
        assert!(second.is_some());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loader_miss_is_not_cached() {
        use std::sync::atomic::Ordering;

        let loader = Arc::new(FakeLoader {
            always_miss: true,
            ..FakeLoader::default()
        });
        let cache = Arc::new(ImageCache::new());
        let p1 = photo("p1");

        assert!(fetch_thumbnail(cache.clone(), loader.clone(), p1.clone())
            .await
            .is_none());
        assert!(fetch_thumbnail(cache.clone(), loader.clone(), p1.clone())
            .await
            .is_none());

        // Misses retry the loader; nothing negative is cached.
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(Tier::Thumbnail), 0);
    }
}
