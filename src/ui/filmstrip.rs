/// Horizontally scrollable filmstrip of every photo in the session
///
/// Each entry shows the thumbnail-tier image (or a placeholder while
/// it loads) plus a badge for any recorded decision. Tapping an entry
/// jumps it to the front of the review stack.

use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Alignment, Color, Element, Length};

use crate::cache::Tier;
use crate::constants::THUMBNAIL_DISPLAY_SIZE;
use crate::state::review::ReviewEngine;
use crate::app::Message;

pub fn view(engine: &ReviewEngine) -> Element<'_, Message> {
    let mut strip = row![].spacing(6).align_y(Alignment::Center);

    for photo in engine.all_photos() {
        let thumb: Element<'_, Message> = match engine.cache().get(Tier::Thumbnail, &photo.id) {
            Some(handle) => image(handle)
                .width(Length::Fixed(THUMBNAIL_DISPLAY_SIZE))
                .height(Length::Fixed(THUMBNAIL_DISPLAY_SIZE))
                .into(),
            None => container(text("·"))
                .width(Length::Fixed(THUMBNAIL_DISPLAY_SIZE))
                .height(Length::Fixed(THUMBNAIL_DISPLAY_SIZE))
                .align_x(Alignment::Center)
                .align_y(Alignment::Center)
                .into(),
        };

        let badge: Element<'_, Message> = match engine.decision_for(&photo.id) {
            Some(decision) => {
                let (r, g, b) = decision.color();
                text(decision.label())
                    .size(9)
                    .color(Color::from_rgb(r, g, b))
                    .into()
            }
            None => text(" ").size(9).into(),
        };

        let entry = column![
            button(thumb)
                .on_press(Message::JumpTo(photo.clone()))
                .padding(0),
            badge,
        ]
        .spacing(2)
        .align_x(Alignment::Center);

        strip = strip.push(entry);
    }

    scrollable(strip)
        .direction(scrollable::Direction::Horizontal(
            scrollable::Scrollbar::new(),
        ))
        .width(Length::Fill)
        .into()
}
