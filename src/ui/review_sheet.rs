/// Delete-review screen
///
/// Shows everything queued for deletion, in queue order, with
/// per-photo restore (which keeps the photo) and the batch commit
/// button. A failed commit leaves the queue intact and reports its
/// error inline.

use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Alignment, Color, Element, Length};

use crate::cache::Tier;
use crate::state::review::ReviewEngine;
use crate::app::Message;

pub fn view<'a>(
    engine: &'a ReviewEngine,
    error: Option<&'a str>,
    committing: bool,
) -> Element<'a, Message> {
    let queued = engine.queued_photos();

    let header = row![
        button("← Back").on_press(Message::CloseReview),
        text(format!("{} photos queued for deletion", queued.len())).size(22),
    ]
    .spacing(16)
    .align_y(Alignment::Center);

    let mut grid = iced_aw::Wrap::new().spacing(10.0).line_spacing(10.0);
    for photo in queued {
        let thumb: Element<'_, Message> = match engine.cache().get(Tier::Thumbnail, &photo.id) {
            Some(handle) => image(handle)
                .width(Length::Fixed(100.0))
                .height(Length::Fixed(100.0))
                .into(),
            None => container(text("…"))
                .width(Length::Fixed(100.0))
                .height(Length::Fixed(100.0))
                .align_x(Alignment::Center)
                .align_y(Alignment::Center)
                .into(),
        };

        let filename = photo.filename.clone();
        let cell = column![
            thumb,
            text(filename).size(11),
            button(text("Restore").size(12))
                .on_press_maybe((!committing).then_some(Message::Restore(photo))),
        ]
        .spacing(4)
        .align_x(Alignment::Center);

        grid = grid.push(container(cell).padding(4));
    }

    let commit_label = if committing {
        "Deleting…".to_string()
    } else {
        format!("Delete {} photos", engine.queued_count())
    };
    let commit = button(text(commit_label).size(16)).on_press_maybe(
        (engine.has_queued() && !committing).then_some(Message::CommitDeletes),
    );

    let mut content = column![header, scrollable(grid).height(Length::Fill), commit]
        .spacing(16)
        .padding(24);

    if let Some(message) = error {
        content = content.push(text(message).size(14).color(Color::from_rgb(0.9, 0.2, 0.2)));
    }

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
