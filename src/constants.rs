/// Application-wide tuning constants
///
/// These numbers define the feel of the swipe interaction and the
/// prefetch behavior. They are grouped here so the gesture math in
/// `ui::cards` and the prefetch logic in `main` stay in sync.

/// Horizontal drag distance (logical pixels) past which a release
/// commits a decision instead of settling back.
pub const SWIPE_THRESHOLD: f32 = 100.0;

/// Duration of the outward exit animation. The decision is committed
/// to the review engine only after this much time has elapsed.
pub const SWIPE_ANIMATION_MS: u64 = 300;

/// Horizontal offset a dismissed card animates out to.
pub const OFFSCREEN_OFFSET: f32 = 500.0;

/// Rotation (degrees) of a card at the end of its exit animation.
pub const MAX_ROTATION: f32 = 15.0;

/// Divisor mapping horizontal drag offset to card rotation:
/// rotation = offset.x / ROTATION_DIVISOR.
pub const ROTATION_DIVISOR: f32 = 20.0;

/// Edge length (square) of thumbnail-tier images.
pub const THUMBNAIL_SIZE: u32 = 100;

/// Displayed edge length of a filmstrip thumbnail.
pub const THUMBNAIL_DISPLAY_SIZE: f32 = 50.0;

/// How many filmstrip thumbnails to prefetch after a load.
pub const THUMBNAIL_PRELOAD: usize = 20;

/// How many cards are visible in the stack, and therefore how many
/// full-size images are prefetched ahead of the top card.
pub const CARD_STACK_COUNT: usize = 3;

/// Target size for full-size card images.
pub const CARD_IMAGE_SIZE: (u32, u32) = (1200, 1600);
