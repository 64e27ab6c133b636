/// Ordered queue of photos awaiting batch deletion
///
/// Insertion order is deletion-intent order. The review engine is the
/// only writer and guarantees an identifier is never added while it is
/// already present, so duplicates cannot occur in practice.

use super::photo::Photo;

#[derive(Debug, Default)]
pub struct DeleteQueue {
    queue: Vec<Photo>,
}

impl DeleteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Photos in insertion order.
    pub fn photos(&self) -> &[Photo] {
        &self.queue
    }

    /// Append a photo to the back of the queue.
    pub fn add(&mut self, photo: Photo) {
        self.queue.push(photo);
    }

    /// Remove the photo with the given identifier. No-op if absent.
    pub fn remove_by_id(&mut self, id: &str) {
        self.queue.retain(|p| p.id != id);
    }

    /// Linear membership check; queue sizes stay small relative to the
    /// library, so this is fine.
    pub fn contains(&self, id: &str) -> bool {
        self.queue.iter().any(|p| p.id == id)
    }

    /// Pop the most-recently-queued photo, or None when empty.
    pub fn remove_last(&mut self) -> Option<Photo> {
        self.queue.pop()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
