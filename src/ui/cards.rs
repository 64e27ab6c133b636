/// Card stack interaction
///
/// Transient per-gesture state for the top card (drag offset, derived
/// rotation) and the two-phase swipe resolution: the outward exit
/// animation plays first, and only after its fixed duration does the
/// review engine observe the decision. The coordinator never owns the
/// engine; it borrows it at resolve time.

use iced::widget::{column, container, image, mouse_area, text, Stack};
use iced::{Alignment, Color, Element, Length, Padding, Point, Vector};

use crate::cache::Tier;
use crate::constants::{
    CARD_STACK_COUNT, MAX_ROTATION, OFFSCREEN_OFFSET, ROTATION_DIVISOR, SWIPE_THRESHOLD,
};
use crate::state::photo::{Decision, Photo};
use crate::state::review::ReviewEngine;
use crate::app::Message;

/// Which way the top card was swiped, and so which decision it commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Keep,
    Delete,
}

impl SwipeDirection {
    fn decision(self) -> Decision {
        match self {
            SwipeDirection::Keep => Decision::Keep,
            SwipeDirection::Delete => Decision::Delete,
        }
    }
}

/// Handed out by `release` when a swipe crossed the threshold; carried
/// by the animation timer back into `resolve`. The sequence number
/// guards against stale timers resolving a later card's gesture.
#[derive(Debug, Clone)]
pub struct ExitToken {
    photo: Photo,
    direction: SwipeDirection,
    seq: u64,
}

/// What a pointer release led to.
#[derive(Debug, Clone)]
pub enum ReleaseOutcome {
    /// Exit animation started; schedule `resolve` with this token
    /// after the animation duration.
    Exit(ExitToken),
    /// Below threshold: the card settled back, no decision.
    Settle,
}

pub struct CardStackCoordinator {
    offset: Vector,
    rotation: f32,
    dragging: bool,
    last_position: Option<Point>,
    drag_origin: Option<Point>,
    exit: Option<u64>,
    next_seq: u64,
}

impl Default for CardStackCoordinator {
    fn default() -> Self {
        CardStackCoordinator {
            offset: Vector::new(0.0, 0.0),
            rotation: 0.0,
            dragging: false,
            last_position: None,
            drag_origin: None,
            exit: None,
            next_seq: 0,
        }
    }
}

impl CardStackCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> Vector {
        self.offset
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// An exit animation is playing and the decision is not yet
    /// committed.
    pub fn is_exiting(&self) -> bool {
        self.exit.is_some()
    }

    /// Track the pointer. While a drag is active the offset follows it
    /// continuously and rotation is derived from the horizontal
    /// component; nothing is committed during the drag.
    pub fn pointer_moved(&mut self, position: Point) {
        self.last_position = Some(position);

        if self.dragging {
            if let Some(origin) = self.drag_origin {
                self.offset = position - origin;
                self.rotation = self.offset.x / ROTATION_DIVISOR;
            }
        }
    }

    /// Begin a drag at the last seen pointer position. Ignored while a
    /// dismissed card is still animating out.
    pub fn begin_drag(&mut self) {
        if self.exit.is_some() {
            return;
        }
        self.dragging = true;
        self.drag_origin = self.last_position;
    }

    /// End the drag over the given top card and decide what happens:
    /// past the threshold the card starts its exit animation (decision
    /// deferred to `resolve`), otherwise it settles back to rest.
    pub fn release(&mut self, photo: &Photo) -> ReleaseOutcome {
        if !self.dragging {
            return ReleaseOutcome::Settle;
        }
        self.dragging = false;
        self.drag_origin = None;

        let direction = if self.offset.x > SWIPE_THRESHOLD {
            SwipeDirection::Keep
        } else if self.offset.x < -SWIPE_THRESHOLD {
            SwipeDirection::Delete
        } else {
            self.reset_transients();
            return ReleaseOutcome::Settle;
        };

        self.begin_exit(photo.clone(), direction)
    }

    fn begin_exit(&mut self, photo: Photo, direction: SwipeDirection) -> ReleaseOutcome {
        let sign = match direction {
            SwipeDirection::Keep => 1.0,
            SwipeDirection::Delete => -1.0,
        };
        self.offset = Vector::new(sign * OFFSCREEN_OFFSET, 0.0);
        self.rotation = sign * MAX_ROTATION;

        self.next_seq += 1;
        let token = ExitToken {
            photo,
            direction,
            seq: self.next_seq,
        };
        self.exit = Some(token.seq);
        ReleaseOutcome::Exit(token)
    }

    /// Commit the decision the exit animation was playing for. Called
    /// by the timer message after the animation duration; the engine
    /// observes the decision only here, never during the animation.
    /// Stale tokens (a previous card's timer) are ignored.
    pub fn resolve(&mut self, token: &ExitToken, engine: &mut ReviewEngine) {
        if self.exit != Some(token.seq) {
            return;
        }
        self.exit = None;

        match token.direction.decision() {
            Decision::Keep => engine.keep(&token.photo),
            Decision::Delete => engine.mark_for_deletion(&token.photo),
        }
        self.reset_transients();
    }

    fn reset_transients(&mut self) {
        self.offset = Vector::new(0.0, 0.0);
        self.rotation = 0.0;
    }
}

/// The card stack area: up to CARD_STACK_COUNT cards with the top one
/// draggable, or a completion panel once the stack is empty.
pub fn view<'a>(
    engine: &'a ReviewEngine,
    coordinator: &CardStackCoordinator,
) -> Element<'a, Message> {
    let stack_photos = engine.stack();

    if stack_photos.is_empty() {
        let done = column![
            text("All photos reviewed 🎉").size(28),
            text(format!(
                "{} kept · {} queued for deletion",
                engine.kept_count(),
                engine.queued_count()
            ))
            .size(16),
        ]
        .spacing(12)
        .align_x(Alignment::Center);

        return container(done)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    }

    // Bottom-to-top so the front of the review stack renders on top.
    let mut layers = Stack::new();
    for photo in stack_photos.iter().take(CARD_STACK_COUNT).rev() {
        let is_top = photo.id == stack_photos[0].id;
        layers = layers.push(card(engine, coordinator, photo, is_top));
    }

    let area = mouse_area(
        container(layers)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill),
    )
    .on_press(Message::CardPressed)
    .on_release(Message::CardReleased)
    .on_move(Message::CardPointerMoved);

    area.into()
}

fn card<'a>(
    engine: &'a ReviewEngine,
    coordinator: &CardStackCoordinator,
    photo: &'a Photo,
    is_top: bool,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match engine.cache().get(Tier::Full, &photo.id) {
        Some(handle) => image(handle)
            .width(Length::Fixed(420.0))
            .height(Length::Fixed(560.0))
            .into(),
        None => container(text("Loading…").size(16))
            .width(Length::Fixed(420.0))
            .height(Length::Fixed(560.0))
            .align_x(Alignment::Center)
            .align_y(Alignment::Center)
            .into(),
    };

    let mut content = column![picture].spacing(6).align_x(Alignment::Center);

    if is_top {
        content = content.push(text(&photo.filename).size(14));
        if let Some(verdict) = verdict_overlay(coordinator) {
            content = content.push(verdict);
        }
    }

    // Translate the top card with the drag; lateral padding is the
    // cheapest offset iced gives us without a custom widget. Rotation
    // feeds the threshold math and exit pose but is not rendered:
    // iced's built-in widgets cannot rotate, and a custom renderer is
    // not worth it for a tilt hint.
    let offset_x = if is_top { coordinator.offset().x } else { 0.0 };
    container(content)
        .padding(Padding {
            top: 0.0,
            right: (-offset_x).max(0.0),
            bottom: 0.0,
            left: offset_x.max(0.0),
        })
        .into()
}

/// KEEP/DELETE label fading in as the drag approaches the threshold.
fn verdict_overlay<'a>(coordinator: &CardStackCoordinator) -> Option<Element<'a, Message>> {
    let x = coordinator.offset().x;
    if x.abs() < 10.0 {
        return None;
    }

    let decision = if x > 0.0 { Decision::Keep } else { Decision::Delete };
    let (r, g, b) = decision.color();
    let strength = (x.abs() / SWIPE_THRESHOLD).min(1.0);

    Some(
        text(decision.label())
            .size(32)
            .color(Color::from_rgba(r, g, b, strength))
            .into(),
    )
}
