/// State management module
///
/// This module handles all review-session state, including:
/// - Shared data structures (photo.rs)
/// - The delete queue (queue.rs)
/// - The review engine and its collaborator traits (review.rs)
/// - Persisted app settings (settings.rs)

pub mod photo;
pub mod queue;
pub mod review;
pub mod settings;
