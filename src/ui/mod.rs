/// UI building blocks
///
/// This module contains:
/// - Card stack interaction and rendering (cards.rs)
/// - The all-photos filmstrip (filmstrip.rs)
/// - The delete-review screen (review_sheet.rs)

pub mod cards;
pub mod filmstrip;
pub mod review_sheet;
