//! Photo Triage — swipe-based photo review.
//!
//! Swipe right to keep, left to queue for deletion; nothing touches
//! the filesystem until the queue is committed in one batch.
//!
//! Module map:
//!
//! | Module      | Responsibility                                      |
//! |-------------|-----------------------------------------------------|
//! | `app`       | iced application: screens, messages, update loop    |
//! | `cache`     | two-tier (full / thumbnail) image cache             |
//! | `constants` | gesture thresholds, animation timing, image sizes   |
//! | `library`   | filesystem collaborators: scan, decode, delete      |
//! | `state`     | review engine, delete queue, photo model, settings  |
//! | `ui`        | card stack, filmstrip, and delete-review views      |

pub mod app;
pub mod cache;
pub mod constants;
pub mod library;
pub mod state;
pub mod ui;
