/// Photo library access module
///
/// Filesystem-backed implementations of the review engine's
/// collaborators:
/// - Enumerating reviewable photos in a folder (scan.rs)
/// - Decoding and resizing images for the cache tiers (loader.rs)
/// - Irreversibly deleting committed photos (store.rs)

pub mod loader;
pub mod scan;
pub mod store;
